use chrono::NaiveDate;
use clap::Parser;
use planview_timeline::{PV_TODAY_ENV, PV_VIEW_ENV, TimelineView, resolve_plan_path};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use planview_cli::config::resolve_today;
use planview_cli::{CliResult, Command, PlanContext};

/// Plan View - project timeline layouts in the terminal
#[derive(Parser)]
#[command(name = "pv")]
#[command(version = "0.1.0")]
#[command(about = "Lay out a project plan on a timeline", long_about = None)]
struct Args {
    /// Path to the plan file (can also be set via PV_PLAN_PATH env var)
    #[arg(long, global = true)]
    plan: Option<PathBuf>,

    /// Timeline granularity: daily, weekly or monthly
    #[arg(long, global = true, env = PV_VIEW_ENV, default_value_t = TimelineView::Weekly)]
    view: TimelineView,

    /// Reference date as YYYY-MM-DD (defaults to the local date)
    #[arg(long, global = true, env = PV_TODAY_ENV)]
    today: Option<NaiveDate>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

/// Initialize logging from RUST_LOG
///
/// Examples:
/// - `RUST_LOG=trace` - show all trace logs, including scroll propagation
/// - `RUST_LOG=debug` - show window inference and plan loading
/// - `RUST_LOG=warn` - show rejected input only (default)
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    match run_app().await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("error: {}", e.full_message());
            process::exit(1);
        }
    }
}

/// Main application logic - separated for testability
async fn run_app() -> CliResult<String> {
    let args = Args::parse();
    run_with_args(&args).await
}

/// Run the application with the given arguments and return its output
async fn run_with_args(args: &Args) -> CliResult<String> {
    let Some(cmd) = &args.command else {
        return Ok([
            "Welcome to Plan View!",
            "Use 'pv --help' for usage information.",
        ]
        .join("\n"));
    };

    let plan_path = resolve_plan_path(args.plan.clone());
    let today = resolve_today(args.today);
    let ctx = PlanContext::load(&plan_path, args.view, today).await?;

    cmd.execute(&ctx).await
}
