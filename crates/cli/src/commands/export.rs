//! Export command for writing the computed layout as JSON
//!
//! Implements the `pv export` command. The document carries the window,
//! header cells with their geometry, the today marker and every row, so
//! other renderers can draw the chart without the engine.

use clap::Args;
use std::path::PathBuf;

use super::PlanContext;
use crate::error::{CliError, CliResult};

/// Export the full layout as JSON
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output file path (defaults to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// Result of the export command
#[derive(Debug)]
pub enum ExportResult {
    /// The JSON document, for printing to stdout
    Stdout(String),
    /// The document was written to a file
    File {
        path: PathBuf,
        tasks: usize,
        units: usize,
    },
}

impl std::fmt::Display for ExportResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportResult::Stdout(json) => write!(f, "{}", json),
            ExportResult::File { path, tasks, units } => {
                writeln!(f, "Export complete!")?;
                writeln!(f, "  Tasks: {}", tasks)?;
                writeln!(f, "  Units: {}", units)?;
                write!(f, "  Output: {}", path.display())
            }
        }
    }
}

impl ExportCommand {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Encode` if serialization fails, or
    /// `CliError::Write` if the output file cannot be written.
    pub async fn execute(&self, ctx: &PlanContext) -> CliResult<ExportResult> {
        let layout = ctx.layout();
        let json = if self.compact {
            serde_json::to_string(&layout)
        } else {
            serde_json::to_string_pretty(&layout)
        }
        .map_err(CliError::Encode)?;

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, json)
                    .await
                    .map_err(|e| CliError::Write {
                        path: path.clone(),
                        source: e,
                    })?;
                tracing::debug!(path = %path.display(), "layout exported");
                Ok(ExportResult::File {
                    path: path.clone(),
                    tasks: layout.task_count(),
                    units: layout.units.len(),
                })
            }
            None => Ok(ExportResult::Stdout(json)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use planview_timeline::{Axe, PlanFile, Project, Task, TimelineView};
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context() -> PlanContext {
        let project = Project::new("Launch").with_axe(
            Axe::new("Ops").with_task(
                Task::new("t1", "Rig stage")
                    .with_dates(date(2024, 6, 3), date(2024, 6, 5))
                    .with_responsible("p1"),
            ),
        );
        let personnel = HashMap::from([("p1".to_string(), "Ada".to_string())]);
        PlanContext::new(
            PlanFile { project, personnel },
            TimelineView::Weekly,
            date(2024, 6, 15),
        )
    }

    #[tokio::test]
    async fn test_export_to_stdout_is_layout_json() {
        let cmd = ExportCommand {
            output: None,
            compact: true,
        };
        let result = cmd.execute(&context()).await.unwrap();
        let json = result.to_string();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["project"], "Launch");
        assert_eq!(value["view"], "weekly");
        assert_eq!(value["window"]["start"], "2024-05-20");
        assert_eq!(value["rows"][0]["kind"], "axe");
        assert_eq!(value["rows"][1]["kind"], "task");
        assert_eq!(value["rows"][1]["responsible"], "Ada");
        assert_eq!(value["rows"][1]["status"], "overdue");
    }

    #[tokio::test]
    async fn test_export_to_file() {
        let path = std::env::temp_dir().join(format!(
            "pv-export-test-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let cmd = ExportCommand {
            output: Some(path.clone()),
            compact: false,
        };

        let result = cmd.execute(&context()).await.unwrap();
        let summary = result.to_string();
        assert!(summary.starts_with("Export complete!"));
        assert!(summary.contains("Tasks: 1"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"project\": \"Launch\""));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_export_to_missing_directory_fails() {
        let cmd = ExportCommand {
            output: Some(PathBuf::from("/nonexistent-dir-pv/layout.json")),
            compact: false,
        };
        let err = cmd.execute(&context()).await.unwrap_err();
        assert!(matches!(err, CliError::Write { .. }));
    }
}
