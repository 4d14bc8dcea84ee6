//! Status command for counting task statuses
//!
//! Implements the `pv status` command: how many tasks of each axe are
//! future, in progress, overdue or undated on the reference date.

use clap::Args;
use planview_timeline::{TaskStatus, classify};
use serde::Serialize;

use super::PlanContext;
use crate::error::{CliError, CliResult};
use crate::output::format_status_table;

/// Status counts for one axe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AxeStatusSummary {
    pub axe: String,
    pub future: usize,
    pub in_progress: usize,
    pub overdue: usize,
    pub no_date: usize,
}

impl AxeStatusSummary {
    pub fn new(axe: impl Into<String>) -> Self {
        Self {
            axe: axe.into(),
            ..Self::default()
        }
    }

    /// Count one task of the given status.
    pub fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Future => self.future += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Overdue => self.overdue += 1,
            TaskStatus::NoDate => self.no_date += 1,
        }
    }

    /// Add another summary's counts to this one.
    pub fn absorb(&mut self, other: &AxeStatusSummary) {
        self.future += other.future;
        self.in_progress += other.in_progress;
        self.overdue += other.overdue;
        self.no_date += other.no_date;
    }

    pub fn total(&self) -> usize {
        self.future + self.in_progress + self.overdue + self.no_date
    }
}

/// Count task statuses per axe
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Print the counts as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusCommand {
    /// Execute the status command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Encode` if JSON output cannot be produced.
    pub fn execute(&self, ctx: &PlanContext) -> CliResult<String> {
        let summaries = summarize(ctx);
        if self.json {
            serde_json::to_string_pretty(&summaries).map_err(CliError::Encode)
        } else {
            Ok(format_status_table(&summaries))
        }
    }
}

/// Classify every task of every axe on the context's reference date.
pub fn summarize(ctx: &PlanContext) -> Vec<AxeStatusSummary> {
    ctx.plan
        .project
        .axes
        .iter()
        .map(|axe| {
            let mut summary = AxeStatusSummary::new(axe.name.clone());
            for task in &axe.tasks {
                summary.record(classify(task, ctx.today));
            }
            summary
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use planview_timeline::{Axe, PlanFile, Project, Task, TimelineView};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context() -> PlanContext {
        let project = Project::new("Launch")
            .with_axe(
                Axe::new("Ops")
                    .with_task(Task::new("a", "x").with_dates(date(2024, 5, 1), date(2024, 6, 1)))
                    .with_task(Task::new("b", "x").with_dates(date(2024, 6, 10), date(2024, 6, 20)))
                    .with_task(Task::new("c", "x")),
            )
            .with_axe(
                Axe::new("Comms")
                    .with_task(Task::new("d", "x").with_dates(date(2024, 7, 1), date(2024, 7, 9))),
            );
        let plan = PlanFile {
            project,
            ..PlanFile::default()
        };
        PlanContext::new(plan, TimelineView::Weekly, date(2024, 6, 15))
    }

    #[test]
    fn test_summarize_counts_per_axe() {
        let summaries = summarize(&context());
        assert_eq!(
            summaries,
            vec![
                AxeStatusSummary {
                    axe: "Ops".to_string(),
                    future: 0,
                    in_progress: 1,
                    overdue: 1,
                    no_date: 1,
                },
                AxeStatusSummary {
                    axe: "Comms".to_string(),
                    future: 1,
                    in_progress: 0,
                    overdue: 0,
                    no_date: 0,
                },
            ]
        );
    }

    #[test]
    fn test_json_output() {
        let output = StatusCommand { json: true }.execute(&context()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["axe"], "Ops");
        assert_eq!(value[1]["future"], 1);
    }

    #[test]
    fn test_table_output_ends_with_total() {
        let output = StatusCommand { json: false }.execute(&context()).unwrap();
        let last: Vec<&str> = output.lines().last().unwrap().split_whitespace().collect();
        assert_eq!(last, vec!["Total", "1", "1", "1", "1", "4"]);
    }
}
