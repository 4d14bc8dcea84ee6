use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for plan input handled by the timeline engine.
///
/// The layout functions themselves never fail; these errors only come
/// from parsing user input and loading plan files.
#[derive(Error, Debug)]
pub enum TimelineError {
    /// Unknown timeline view name
    #[error("Invalid timeline view '{value}': expected daily, weekly or monthly")]
    InvalidView { value: String },

    /// Unknown priority name
    #[error("Invalid priority '{value}': expected low, medium, high or urgent")]
    InvalidPriority { value: String },

    /// Task ends before it starts
    #[error("Task '{task_id}' ends on {end} before it starts on {start}")]
    InvalidDateRange {
        task_id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Task without an identifier
    #[error("Task '{description}' has an empty id")]
    MissingTaskId { description: String },

    /// Error reading a plan file from disk
    #[error("Failed to read plan file at {path}: {source}")]
    PlanRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error decoding plan JSON
    #[error("Failed to parse plan: {0}")]
    PlanParse(#[from] serde_json::Error),
}

/// Result type alias for timeline operations
pub type TimelineResult<T> = Result<T, TimelineError>;
