//! Units command for listing timeline header cells
//!
//! Implements the `pv units` command.

use clap::Args;

use super::PlanContext;
use crate::output::format_units_table;

/// Show the header cells of the timeline
#[derive(Debug, Args)]
pub struct UnitsCommand {
    /// Print only the labels, one per line
    #[arg(long)]
    pub labels: bool,
}

impl UnitsCommand {
    pub fn execute(&self, ctx: &PlanContext) -> String {
        let layout = ctx.layout();
        if self.labels {
            layout
                .units
                .iter()
                .map(|unit| unit.label.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            let mut output = format!(
                "{} ({} view, {} to {}, {} days)\n\n",
                layout.project,
                layout.view,
                layout.window.start,
                layout.window.end,
                layout.window.days()
            );
            output.push_str(&format_units_table(&layout));
            output
        }
    }
}
