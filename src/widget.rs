use crate::geometry::{MapPoint, ScreenPoint};
use crate::map::{MapModel, Segment};
use crate::state::AppState;
use druid::kurbo::{Circle, Line, Size};
use druid::text::FontFamily;
use druid::widget::prelude::*;
use druid::{
    commands,
    piet::{Text, TextLayoutBuilder},
    Color, RenderContext, Widget,
};
use std::sync::{Arc, Mutex};

const PREVIEW_COLOR: Color = Color::rgb8(255, 200, 200);
const MARKER_RADIUS: f64 = 10.0;

/// Map editor canvas widget
pub struct EditorWidget {
    /// Map under edit; `main` keeps a clone and serializes it after the
    /// run loop returns.
    model: Arc<Mutex<MapModel>>,
    /// Grid cells per axis
    grid_size: u32,
    /// Start point of the drag in progress, if any. `None` means idle;
    /// the first press is always a fresh idle-to-drawing transition,
    /// even if the button was already down when the window opened.
    drag_start: Option<MapPoint>,
    /// Snapped pointer position as of the last mouse event
    grid_pos: MapPoint,
    /// Widget size
    size: Size,
}

impl EditorWidget {
    pub fn new(model: Arc<Mutex<MapModel>>, grid_size: u32) -> Self {
        EditorWidget {
            model,
            grid_size,
            drag_start: None,
            grid_pos: MapPoint::new(0.0, 0.0),
            size: Size::ZERO,
        }
    }

    /// Converts a pointer position to its snapped map-space grid point.
    fn snap_pointer(&self, pos: druid::kurbo::Point) -> MapPoint {
        ScreenPoint::from(pos).to_map(self.size).snapped(self.grid_size)
    }
}

impl Widget<AppState> for EditorWidget {
    /// Handle events for the editor widget
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut AppState, _env: &Env) {
        match event {
            Event::WindowConnected => {
                // Request focus to receive keyboard events
                ctx.request_focus();
            }
            Event::KeyDown(key_event) => match &key_event.key {
                druid::keyboard_types::Key::Character(s) => match s.as_str() {
                    "q" | "Q" => {
                        ctx.submit_command(commands::QUIT_APP);
                    }
                    "d" | "D" => {
                        data.debug = !data.debug;
                        ctx.request_paint();
                    }
                    _ => {}
                },
                druid::keyboard_types::Key::Escape => {
                    ctx.submit_command(commands::QUIT_APP);
                }
                _ => {}
            },
            Event::MouseDown(mouse_event) => {
                if mouse_event.button == druid::MouseButton::Left {
                    self.grid_pos = self.snap_pointer(mouse_event.pos);
                    self.drag_start = Some(self.grid_pos);
                    ctx.set_active(true); // Capture mouse events
                    ctx.request_paint();
                }
            }
            Event::MouseMove(mouse_event) => {
                self.grid_pos = self.snap_pointer(mouse_event.pos);
                ctx.request_paint();
            }
            Event::MouseUp(mouse_event) => {
                if mouse_event.button == druid::MouseButton::Left {
                    if let Some(start) = self.drag_start.take() {
                        self.grid_pos = self.snap_pointer(mouse_event.pos);
                        let segment = Segment::new(start, self.grid_pos);
                        tracing::info!(
                            p1 = ?(segment.p1.x, segment.p1.y),
                            p2 = ?(segment.p2.x, segment.p2.y),
                            "line added"
                        );
                        self.model.lock().unwrap().append(segment);
                        ctx.set_active(false);
                        ctx.request_paint();
                    }
                }
            }
            _ => {}
        }
    }

    fn lifecycle(
        &mut self,
        _ctx: &mut LifeCycleCtx,
        event: &LifeCycle,
        _data: &AppState,
        _env: &Env,
    ) {
        if let LifeCycle::Size(size) = event {
            self.size = *size;
        }
    }

    fn update(&mut self, _ctx: &mut UpdateCtx, _old_data: &AppState, _data: &AppState, _env: &Env) {
    }

    /// Determines the layout constraints for the editor widget
    fn layout(
        &mut self,
        _layout_ctx: &mut LayoutCtx,
        bc: &BoxConstraints,
        _data: &AppState,
        _env: &Env,
    ) -> Size {
        let size = bc.max();
        self.size = size;
        size
    }

    /// Paint the editor widget
    fn paint(&mut self, ctx: &mut PaintCtx, data: &AppState, _env: &Env) {
        let size = ctx.size();
        ctx.fill(size.to_rect(), &Color::WHITE);

        let model = self.model.lock().unwrap();
        for segment in model.segments() {
            let p1 = segment.p1.to_screen(size);
            let p2 = segment.p2.to_screen(size);
            ctx.stroke(Line::new(p1, p2), &Color::BLACK, 1.0);
        }

        // Live preview of the drag in progress; not committed until release
        if let Some(start) = self.drag_start {
            let p1 = start.to_screen(size);
            let p2 = self.grid_pos.to_screen(size);
            ctx.stroke(Line::new(p1, p2), &PREVIEW_COLOR, 1.0);
        }

        // Snap feedback marker at the pointer's grid position
        let marker = Circle::new(self.grid_pos.to_screen(size), MARKER_RADIUS);
        ctx.stroke(marker, &Color::BLACK, 1.0);

        // Add debug info if debug mode is enabled
        if data.debug {
            let text = format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            let text_layout = ctx
                .text()
                .new_text_layout(text)
                .font(FontFamily::SYSTEM_UI, 12.0)
                .text_color(Color::BLACK)
                .build()
                .unwrap();
            ctx.draw_text(&text_layout, (10.0, 10.0));

            let text = format!(
                "Lines: {}, Grid: ({:.2}, {:.2})",
                model.segments().len(),
                self.grid_pos.x,
                self.grid_pos.y
            );
            let text_layout = ctx
                .text()
                .new_text_layout(text)
                .font(FontFamily::SYSTEM_UI, 12.0)
                .text_color(Color::BLACK)
                .build()
                .unwrap();
            ctx.draw_text(&text_layout, (10.0, 30.0));
        }
    }
}
