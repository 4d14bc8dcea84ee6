//! Error types for the TUI module.

use std::io;
use thiserror::Error;

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// Failed to initialize or restore the terminal.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Plan file could not be loaded.
    #[error("Plan error: {0}")]
    Plan(#[from] planview_timeline::TimelineError),
}
