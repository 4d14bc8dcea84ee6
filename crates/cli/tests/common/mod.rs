//! Test infrastructure for integration tests
//!
//! Provides isolated plan files on disk and command builder helpers.
//! Each test gets its own temp directory to ensure no shared state.

use chrono::NaiveDate;
use planview_cli::commands::{BarsCommand, ExportCommand, PlanContext, StatusCommand};
use planview_timeline::TimelineView;
use std::path::PathBuf;

/// A small launch plan spanning June 2024.
pub const LAUNCH_PLAN: &str = r#"{
    "project": {
        "name": "Festival launch",
        "axes": [
            {
                "name": "Operations",
                "tasks": [
                    {
                        "id": "ops-1",
                        "description": "Rig stage",
                        "responsibleIds": ["p-ada", "p-bob"],
                        "priority": "high",
                        "startDate": "2024-06-03",
                        "endDate": "2024-06-05"
                    },
                    {
                        "id": "ops-2",
                        "description": "Sound check",
                        "responsibleIds": ["p-zed"],
                        "startDate": "2024-06-14",
                        "endDate": "2024-06-16",
                        "comment": "needs the full band"
                    }
                ]
            },
            {
                "name": "Communication",
                "tasks": [
                    {
                        "id": "com-1",
                        "description": "Press release",
                        "startDate": "2024-06-20",
                        "endDate": "2024-06-28"
                    },
                    {
                        "id": "com-2",
                        "description": "Social teaser"
                    }
                ]
            }
        ]
    },
    "personnel": {
        "p-ada": "Ada Lovelace",
        "p-bob": "Bob Marley"
    }
}"#;

/// Reference date used by every scenario.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

/// Test context owning a temp directory with plan files.
pub struct TestContext {
    pub temp_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context with an isolated temp directory.
    ///
    /// Each call creates a uniquely named directory using process ID,
    /// thread ID, and nanosecond timestamp to guarantee isolation.
    pub fn new() -> Self {
        let temp_dir = std::env::temp_dir().join(format!(
            "pv-integration-test-{}-{:?}-{}",
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&temp_dir).unwrap();

        Self { temp_dir }
    }

    /// Write `contents` as `name` inside the temp directory.
    pub fn write_plan(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write the launch plan and load it at `view`.
    pub async fn launch(&self, view: TimelineView) -> PlanContext {
        let path = self.write_plan("plan.json", LAUNCH_PLAN);
        PlanContext::load(&path, view, today()).await.unwrap()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Auto-cleanup on drop
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}

// =============================================================================
// Command Builder Helpers
// =============================================================================

/// A BarsCommand without filters.
pub fn bars_cmd(width: usize) -> BarsCommand {
    BarsCommand {
        axe: None,
        statuses: vec![],
        width,
    }
}

/// A StatusCommand printing a table.
pub fn status_cmd() -> StatusCommand {
    StatusCommand { json: false }
}

/// An ExportCommand writing compact JSON to stdout or `output`.
pub fn export_cmd(output: Option<PathBuf>) -> ExportCommand {
    ExportCommand {
        output,
        compact: true,
    }
}
