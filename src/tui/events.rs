//! Event types joining user input and async request completions.

use crossterm::event::KeyEvent;

use crate::client::{ExecError, ExecOutcome};

/// Events consumed by the single TUI apply loop. Request tasks never touch
/// state directly; they post `ExecFinished` here so outcomes are applied one
/// at a time.
#[derive(Debug)]
pub enum TuiEvent {
    /// User keyboard input.
    Key(KeyEvent),
    /// An `/execute` or `/input` round-trip finished.
    ExecFinished(Result<ExecOutcome, ExecError>),
    /// Request to quit the application.
    Quit,
}
