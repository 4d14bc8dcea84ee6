//! Subcommands of the `pv` binary.
//!
//! Every command works on a [`PlanContext`]: the loaded plan plus the
//! view and reference date chosen on the command line.

pub mod bars;
pub mod export;
pub mod status;
pub mod units;

use chrono::NaiveDate;
use clap::Subcommand;
use planview_timeline::{PlanFile, PlanLayout, TimelineView};
use std::path::Path;

use crate::error::CliResult;

pub use bars::BarsCommand;
pub use export::{ExportCommand, ExportResult};
pub use status::{AxeStatusSummary, StatusCommand};
pub use units::UnitsCommand;

/// A loaded plan together with the view and date to lay it out for.
#[derive(Debug, Clone)]
pub struct PlanContext {
    pub plan: PlanFile,
    pub view: TimelineView,
    pub today: NaiveDate,
}

impl PlanContext {
    pub fn new(plan: PlanFile, view: TimelineView, today: NaiveDate) -> Self {
        Self { plan, view, today }
    }

    /// Read, parse and validate the plan file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::PlanRead` if the file cannot be read, or the
    /// parse/validation error of the plan.
    pub async fn load(path: &Path, view: TimelineView, today: NaiveDate) -> CliResult<Self> {
        let plan = PlanFile::load(path).await?;
        tracing::debug!(%view, %today, "laying out plan");
        Ok(Self::new(plan, view, today))
    }

    /// Compute the layout for this context.
    pub fn layout(&self) -> PlanLayout {
        PlanLayout::compute(&self.plan.project, self.view, self.today, &self.plan.personnel)
    }
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the time unit header cells of the timeline
    Units(UnitsCommand),
    /// Show each task's bar geometry and status
    Bars(BarsCommand),
    /// Count task statuses per axe
    Status(StatusCommand),
    /// Export the full layout as JSON
    Export(ExportCommand),
}

impl Command {
    /// Execute the command and return its printable output.
    pub async fn execute(&self, ctx: &PlanContext) -> CliResult<String> {
        match self {
            Command::Units(cmd) => Ok(cmd.execute(ctx)),
            Command::Bars(cmd) => cmd.execute(ctx),
            Command::Status(cmd) => cmd.execute(ctx),
            Command::Export(cmd) => Ok(cmd.execute(ctx).await?.to_string()),
        }
    }
}
