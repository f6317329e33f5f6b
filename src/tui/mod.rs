//! Terminal UI for the playground: editor pane, output pane, save/load modal.

pub mod app;
pub mod events;
pub mod handler;
pub mod ui;

pub use handler::run_tui;
