//! Terminal user interface for the snapshot viewer.
//!
//! Renders each consumed snapshot as a colored tree and keeps a bounded
//! history of recent scenes for pause-and-step inspection.

mod app;
mod event;
mod input;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use state::{AppState, SceneEntry};
