use druid::Data;

/// Application state
#[derive(Clone, Data)]
pub struct AppState {
    /// Enable the debug overlay
    pub debug: bool,
}

impl AppState {
    pub fn new() -> Self {
        AppState { debug: false }
    }
}
