mod geometry;
mod map;
mod state;
mod widget;

use crate::map::{write_map, MapModel, WriteMapError};
use crate::state::AppState;
use crate::widget::EditorWidget;
use clap::Parser;
use druid::{AppLauncher, LocalizedString, PlatformError, WindowDesc};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

const WINDOW_SIZE: f64 = 600.0;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path of the map file written on exit
    #[arg(short, long, default_value = "testMap.json")]
    output: PathBuf,

    /// Grid cells per axis
    #[arg(short, long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    grid_size: u32,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    WriteMap(#[from] WriteMapError),
}

/// Main function
fn main() -> Result<(), AppError> {
    let args = Args::parse();
    tracing_subscriber::fmt::init();

    let model = Arc::new(Mutex::new(MapModel::new()));

    let main_window = WindowDesc::new(EditorWidget::new(model.clone(), args.grid_size))
        .title(LocalizedString::new("Line Map Editor"))
        .window_size((WINDOW_SIZE, WINDOW_SIZE))
        .resizable(false);

    // Blocks until the window is closed or escape/q is pressed; both exits
    // fall through to serialization.
    AppLauncher::with_window(main_window).launch(AppState::new())?;

    let model = model.lock().unwrap();
    match write_map(&model, &args.output) {
        Ok(()) => {
            tracing::info!(
                lines = model.segments().len(),
                path = %args.output.display(),
                "map written"
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to write map");
            Err(err.into())
        }
    }
}
