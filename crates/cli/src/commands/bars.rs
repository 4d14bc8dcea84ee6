//! Bars command for showing task placement
//!
//! Implements the `pv bars` command: one line per task with its dates,
//! status, percentage geometry and an ASCII rendering of the bar.

use clap::Args;
use planview_timeline::{TaskRow, TaskStatus};

use super::PlanContext;
use crate::error::{CliError, CliResult};
use crate::output::format_bar_table;

/// Show each task's bar geometry and status
#[derive(Debug, Args)]
pub struct BarsCommand {
    /// Only show tasks of this axe
    #[arg(short, long)]
    pub axe: Option<String>,

    /// Filter by status (can be specified multiple times)
    #[arg(short, long = "status", value_parser = parse_status)]
    pub statuses: Vec<TaskStatus>,

    /// Width of the ASCII bar track, in characters
    #[arg(short, long, default_value_t = 40)]
    pub width: usize,
}

/// Parse a status string into a TaskStatus
fn parse_status(s: &str) -> Result<TaskStatus, String> {
    match s.to_lowercase().replace('-', "_").as_str() {
        "future" => Ok(TaskStatus::Future),
        "in_progress" => Ok(TaskStatus::InProgress),
        "overdue" => Ok(TaskStatus::Overdue),
        "no_date" => Ok(TaskStatus::NoDate),
        _ => Err(format!(
            "invalid status '{}'. Valid values: future, in_progress, overdue, no_date",
            s
        )),
    }
}

impl BarsCommand {
    /// Execute the bars command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::UnknownAxe` if `--axe` names no axe of the project.
    pub fn execute(&self, ctx: &PlanContext) -> CliResult<String> {
        if let Some(name) = &self.axe
            && !ctx.plan.project.axes.iter().any(|axe| &axe.name == name)
        {
            return Err(CliError::UnknownAxe {
                name: name.clone(),
                project: ctx.plan.project.name.clone(),
            });
        }

        let layout = ctx.layout();
        let rows: Vec<&TaskRow> = layout
            .task_rows()
            .filter(|row| self.axe.as_ref().is_none_or(|name| &row.axe == name))
            .filter(|row| self.statuses.is_empty() || self.statuses.contains(&row.status))
            .collect();

        Ok(format_bar_table(&rows, self.width))
    }
}
