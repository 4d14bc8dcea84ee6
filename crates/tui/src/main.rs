//! Entry point for the Plan View TUI application.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use planview_timeline::{PV_TODAY_ENV, PV_VIEW_ENV, TimelineView, resolve_plan_path};
use planview_tui::{App, TuiResult};

/// Plan View TUI - interactive project timeline
#[derive(Parser)]
#[command(name = "pv-tui")]
#[command(version = "0.1.0")]
#[command(about = "Browse a project plan as an interactive timeline", long_about = None)]
struct Args {
    /// Path to the plan file (can also be set via PV_PLAN_PATH env var)
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Initial timeline granularity: daily, weekly or monthly
    #[arg(long, env = PV_VIEW_ENV, default_value_t = TimelineView::Weekly)]
    view: TimelineView,

    /// Fixed reference date as YYYY-MM-DD (defaults to following the clock)
    #[arg(long, env = PV_TODAY_ENV)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> TuiResult<()> {
    let args = Args::parse();
    let path = resolve_plan_path(args.plan);
    let mut app = App::load(path, args.view, args.today).await?;
    app.run().await
}
