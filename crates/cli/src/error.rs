//! Error type for the `pv` command line.

use planview_timeline::TimelineError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// Plan loading or validation failed
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// Error writing command output to a file
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error encoding the layout as JSON
    #[error("Failed to encode layout: {0}")]
    Encode(#[source] serde_json::Error),

    /// Unknown axe name passed as a filter
    #[error("No axe named '{name}' in project '{project}'")]
    UnknownAxe { name: String, project: String },
}

impl CliError {
    /// Message printed by `main`, with a hint where one helps.
    pub fn full_message(&self) -> String {
        match self {
            CliError::Timeline(TimelineError::PlanRead { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                format!("{self} (pass --plan or set PV_PLAN_PATH)")
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;
