//! Plan data consumed by the timeline engine
//!
//! Tasks are owned by the surrounding application; the engine only
//! reads them. Tasks are grouped by axe (work stream) inside a project.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use crate::error::{TimelineError, TimelineResult};

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Returns the string representation used in plan files
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TimelineError;

    fn from_str(s: &str) -> TimelineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(TimelineError::InvalidPriority {
                value: s.to_string(),
            }),
        }
    }
}

/// A project task as supplied by the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    /// Personnel identifiers, resolved through a [`PersonnelDirectory`].
    #[serde(default)]
    pub responsible_ids: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Task {
    /// Create an undated medium-priority task.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            responsible_ids: Vec::new(),
            priority: Priority::default(),
            start_date: None,
            end_date: None,
            comment: None,
        }
    }

    /// Builder method to set both dates.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Builder method to set only the start date.
    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Builder method to set only the end date.
    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Builder method to add a responsible person.
    pub fn with_responsible(mut self, person_id: impl Into<String>) -> Self {
        self.responsible_ids.push(person_id.into());
        self
    }

    /// Builder method to set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Both dates, or `None` when either is missing.
    ///
    /// A task with only one date is treated as having no range at all.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Reject tasks the layout cannot place meaningfully.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::MissingTaskId` for a blank id and
    /// `TimelineError::InvalidDateRange` when the end precedes the start.
    pub fn validate(&self) -> TimelineResult<()> {
        if self.id.trim().is_empty() {
            return Err(TimelineError::MissingTaskId {
                description: self.description.clone(),
            });
        }
        if let Some((start, end)) = self.date_range()
            && end < start
        {
            return Err(TimelineError::InvalidDateRange {
                task_id: self.id.clone(),
                start,
                end,
            });
        }
        Ok(())
    }
}

/// A named work stream grouping tasks inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Axe {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Axe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Builder method to append a task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }
}

/// A project and its axes, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub axes: Vec<Axe>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axes: Vec::new(),
        }
    }

    /// Builder method to append an axe.
    pub fn with_axe(mut self, axe: Axe) -> Self {
        self.axes.push(axe);
        self
    }

    /// Every task in axe order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.axes.iter().flat_map(|axe| axe.tasks.iter())
    }

    /// Total number of tasks across all axes.
    pub fn task_count(&self) -> usize {
        self.axes.iter().map(|axe| axe.tasks.len()).sum()
    }

    /// Look up a task by id.
    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks().find(|task| task.id == id)
    }
}

/// Resolves personnel identifiers to display names.
///
/// Owned by an external registry; lookups are expected to be cheap.
pub trait PersonnelDirectory {
    fn display_name(&self, person_id: &str) -> Option<String>;
}

impl PersonnelDirectory for HashMap<String, String> {
    fn display_name(&self, person_id: &str) -> Option<String> {
        self.get(person_id).cloned()
    }
}

/// A directory that knows nobody; labels fall back to raw identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirectory;

impl PersonnelDirectory for NoDirectory {
    fn display_name(&self, _person_id: &str) -> Option<String> {
        None
    }
}

/// Label listing the people responsible for `task`.
pub fn responsible_label(task: &Task, directory: &dyn PersonnelDirectory) -> String {
    if task.responsible_ids.is_empty() {
        return "Unassigned".to_string();
    }
    task.responsible_ids
        .iter()
        .map(|id| directory.display_name(id).unwrap_or_else(|| id.clone()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Plan file location relative to the project root.
pub const DEFAULT_PLAN_PATH: &str = ".planview/plan.json";

/// Environment variable name for the plan file path
pub const PV_PLAN_PATH_ENV: &str = "PV_PLAN_PATH";

/// Environment variable name for the initial timeline view
pub const PV_VIEW_ENV: &str = "PV_VIEW";

/// Environment variable name for the reference date
pub const PV_TODAY_ENV: &str = "PV_TODAY";

/// A plan document: the project plus its personnel lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanFile {
    pub project: Project,
    /// Personnel id to display name.
    #[serde(default)]
    pub personnel: HashMap<String, String>,
}

impl PlanFile {
    /// Default plan location: `.planview/plan.json` under the git project
    /// root, or under the current directory outside a repository.
    pub fn default_path() -> PathBuf {
        let base_path = find_project_root().unwrap_or_else(|| PathBuf::from("."));
        base_path.join(DEFAULT_PLAN_PATH)
    }

    /// Parse and validate a plan from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::PlanParse` for malformed JSON, or the
    /// validation error of the first invalid task.
    pub fn from_json_str(json: &str) -> TimelineResult<Self> {
        let plan: PlanFile = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Read, parse and validate a plan file.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::PlanRead` if the file cannot be read, plus
    /// any error from [`PlanFile::from_json_str`].
    pub async fn load(path: &Path) -> TimelineResult<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TimelineError::PlanRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        let plan = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            tasks = plan.project.task_count(),
            "plan loaded"
        );
        Ok(plan)
    }

    /// Validate every task in the plan.
    ///
    /// # Errors
    ///
    /// Returns the first task validation error encountered.
    pub fn validate(&self) -> TimelineResult<()> {
        for task in self.project.tasks() {
            if let Err(e) = task.validate() {
                tracing::warn!(task_id = %task.id, error = %e, "rejecting plan with invalid task");
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Get the plan path from command line, environment variable, or default.
///
/// Priority:
/// 1. Command line --plan argument
/// 2. PV_PLAN_PATH environment variable (if non-empty)
/// 3. Default path (<project root>/.planview/plan.json)
pub fn resolve_plan_path(cli_plan: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_plan {
        return path;
    }

    if let Ok(env_path) = std::env::var(PV_PLAN_PATH_ENV)
        && !env_path.is_empty()
    {
        return PathBuf::from(env_path);
    }

    PlanFile::default_path()
}

/// Find the project root directory by locating the git repository root.
///
/// Returns `None` when not inside a git repository or git is unavailable.
pub fn find_project_root() -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;

    if output.status.success() {
        let path_str = String::from_utf8(output.stdout).ok()?;
        Some(PathBuf::from(path_str.trim()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // =============================================
    // Priority
    // =============================================

    #[test]
    fn test_priority_as_str() {
        assert_eq!(Priority::Low.as_str(), "low");
        assert_eq!(Priority::Medium.as_str(), "medium");
        assert_eq!(Priority::High.as_str(), "high");
        assert_eq!(Priority::Urgent.as_str(), "urgent");
    }

    #[test]
    fn test_priority_from_str_is_case_insensitive() {
        assert_eq!("URGENT".parse::<Priority>().unwrap(), Priority::Urgent);
        assert!("critical".parse::<Priority>().is_err());
    }

    // =============================================
    // Task
    // =============================================

    #[test]
    fn test_task_date_range_requires_both_dates() {
        let start_only = Task::new("t1", "A").with_start(date(2024, 6, 1));
        let end_only = Task::new("t2", "B").with_end(date(2024, 6, 1));
        let both = Task::new("t3", "C").with_dates(date(2024, 6, 1), date(2024, 6, 3));

        assert_eq!(start_only.date_range(), None);
        assert_eq!(end_only.date_range(), None);
        assert_eq!(both.date_range(), Some((date(2024, 6, 1), date(2024, 6, 3))));
    }

    #[test]
    fn test_task_validate_rejects_reversed_range() {
        let task = Task::new("t1", "Backwards").with_dates(date(2024, 6, 10), date(2024, 6, 1));
        assert!(matches!(
            task.validate(),
            Err(TimelineError::InvalidDateRange { task_id, .. }) if task_id == "t1"
        ));
    }

    #[test]
    fn test_task_validate_rejects_blank_id() {
        let task = Task::new("  ", "Nameless");
        assert!(matches!(
            task.validate(),
            Err(TimelineError::MissingTaskId { .. })
        ));
    }

    #[test]
    fn test_task_validate_accepts_single_day() {
        let task = Task::new("t1", "Today").with_dates(date(2024, 6, 1), date(2024, 6, 1));
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_task_deserializes_camel_case() {
        let json = r#"{
            "id": "t1",
            "description": "Stage build",
            "responsibleIds": ["p1", "p2"],
            "priority": "high",
            "startDate": "2024-06-03",
            "endDate": "2024-06-05"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.responsible_ids, vec!["p1", "p2"]);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.start_date, Some(date(2024, 6, 3)));
        assert_eq!(task.comment, None);
    }

    #[test]
    fn test_task_defaults_when_fields_missing() {
        let task: Task = serde_json::from_str(r#"{"id": "t1", "description": "x"}"#).unwrap();
        assert!(task.responsible_ids.is_empty());
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.date_range(), None);
    }

    // =============================================
    // Project grouping
    // =============================================

    #[test]
    fn test_project_tasks_in_axe_order() {
        let project = Project::new("Festival")
            .with_axe(Axe::new("Logistics").with_task(Task::new("a", "A")))
            .with_axe(
                Axe::new("Comms")
                    .with_task(Task::new("b", "B"))
                    .with_task(Task::new("c", "C")),
            );

        let ids: Vec<&str> = project.tasks().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(project.task_count(), 3);
        assert_eq!(project.find_task("c").map(|t| t.description.as_str()), Some("C"));
        assert!(project.find_task("zz").is_none());
    }

    // =============================================
    // Personnel labels
    // =============================================

    #[test]
    fn test_responsible_label_resolves_names() {
        let mut directory = HashMap::new();
        directory.insert("p1".to_string(), "Ada".to_string());
        directory.insert("p2".to_string(), "Linus".to_string());
        let task = Task::new("t1", "x").with_responsible("p1").with_responsible("p2");

        assert_eq!(responsible_label(&task, &directory), "Ada, Linus");
    }

    #[test]
    fn test_responsible_label_falls_back_to_id() {
        let task = Task::new("t1", "x").with_responsible("p9");
        assert_eq!(responsible_label(&task, &NoDirectory), "p9");
    }

    #[test]
    fn test_responsible_label_unassigned() {
        let task = Task::new("t1", "x");
        assert_eq!(responsible_label(&task, &NoDirectory), "Unassigned");
    }

    // =============================================
    // Plan files
    // =============================================

    #[test]
    fn test_plan_from_json_str() {
        let json = r#"{
            "project": {
                "name": "Expo",
                "axes": [
                    {"name": "Venue", "tasks": [
                        {"id": "t1", "description": "Book hall",
                         "startDate": "2024-06-03", "endDate": "2024-06-05"}
                    ]}
                ]
            },
            "personnel": {"p1": "Ada"}
        }"#;
        let plan = PlanFile::from_json_str(json).unwrap();
        assert_eq!(plan.project.name, "Expo");
        assert_eq!(plan.project.task_count(), 1);
        assert_eq!(plan.personnel.get("p1").map(String::as_str), Some("Ada"));
    }

    #[test]
    fn test_plan_from_json_str_rejects_invalid_task() {
        let json = r#"{"project": {"name": "Expo", "axes": [{"name": "Venue", "tasks": [
            {"id": "t1", "description": "x", "startDate": "2024-06-05", "endDate": "2024-06-01"}
        ]}]}}"#;
        assert!(matches!(
            PlanFile::from_json_str(json),
            Err(TimelineError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_plan_from_json_str_rejects_bad_date() {
        let json = r#"{"project": {"name": "Expo", "axes": [{"name": "Venue", "tasks": [
            {"id": "t1", "description": "x", "startDate": "2024-13-45"}
        ]}]}}"#;
        assert!(matches!(
            PlanFile::from_json_str(json),
            Err(TimelineError::PlanParse(_))
        ));
    }

    #[test]
    fn test_default_path_ends_with_plan_file() {
        let path = PlanFile::default_path();
        assert!(
            path.ends_with(".planview/plan.json"),
            "Path should end with .planview/plan.json, got: {:?}",
            path
        );
    }

    // =============================================
    // Plan file loading
    // =============================================

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "planview-{}-{}-{:?}.json",
            name,
            std::process::id(),
            std::thread::current().id(),
        ))
    }

    #[tokio::test]
    async fn test_plan_load_round_trips_saved_plan() {
        let plan = PlanFile {
            project: Project::new("Launch").with_axe(
                Axe::new("Ops").with_task(Task {
                    comment: Some("truck at 8am".to_string()),
                    ..Task::new("t1", "Rig").with_dates(date(2024, 6, 3), date(2024, 6, 5))
                }),
            ),
            personnel: HashMap::from([("p1".to_string(), "Ada".to_string())]),
        };
        let path = temp_path("roundtrip");
        std::fs::write(&path, serde_json::to_string(&plan).unwrap()).unwrap();

        let loaded = PlanFile::load(&path).await.unwrap();
        assert_eq!(loaded, plan);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_plan_load_missing_file() {
        let result = PlanFile::load(Path::new("/nonexistent/planview/plan.json")).await;
        assert!(matches!(result, Err(TimelineError::PlanRead { .. })));
    }

    #[tokio::test]
    async fn test_plan_load_invalid_json() {
        let path = temp_path("invalid");
        std::fs::write(&path, "[1, 2").unwrap();

        let result = PlanFile::load(&path).await;
        assert!(matches!(result, Err(TimelineError::PlanParse(_))));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_plan_load_rejects_invalid_task() {
        let path = temp_path("reversed");
        std::fs::write(
            &path,
            r#"{"project": {"name": "Expo", "axes": [{"name": "Venue", "tasks": [
                {"id": "t1", "description": "x", "startDate": "2024-06-10", "endDate": "2024-06-01"}
            ]}]}}"#,
        )
        .unwrap();

        let result = PlanFile::load(&path).await;
        assert!(matches!(result, Err(TimelineError::InvalidDateRange { .. })));

        let _ = std::fs::remove_file(&path);
    }

    // =============================================
    // Plan path resolution
    // =============================================

    /// Run `f` with PV_PLAN_PATH set to `value` (or unset), restoring it after.
    fn with_plan_env<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let original = std::env::var(PV_PLAN_PATH_ENV).ok();
        // SAFETY: Tests touching the environment are serialized
        unsafe {
            match value {
                Some(v) => std::env::set_var(PV_PLAN_PATH_ENV, v),
                None => std::env::remove_var(PV_PLAN_PATH_ENV),
            }
        }

        let result = f();

        // SAFETY: Restoring the original state under the same serialization
        unsafe {
            match original {
                Some(val) => std::env::set_var(PV_PLAN_PATH_ENV, val),
                None => std::env::remove_var(PV_PLAN_PATH_ENV),
            }
        }
        result
    }

    #[test]
    #[serial]
    fn test_resolve_plan_path_cli_takes_priority() {
        let cli_path = PathBuf::from("/custom/plan.json");
        let result = with_plan_env(Some("/env/plan.json"), || {
            resolve_plan_path(Some(cli_path.clone()))
        });
        assert_eq!(result, cli_path);
    }

    #[test]
    #[serial]
    fn test_resolve_plan_path_env_var_takes_priority_over_default() {
        let result = with_plan_env(Some("/env/plan.json"), || resolve_plan_path(None));
        assert_eq!(result, PathBuf::from("/env/plan.json"));
    }

    #[test]
    #[serial]
    fn test_resolve_plan_path_empty_env_var_uses_default() {
        let result = with_plan_env(Some(""), || resolve_plan_path(None));
        assert!(
            result.ends_with(".planview/plan.json"),
            "Expected path ending with .planview/plan.json, got: {:?}",
            result
        );
    }

    #[test]
    #[serial]
    fn test_resolve_plan_path_unset_env_var_uses_default() {
        let result = with_plan_env(None, || resolve_plan_path(None));
        assert!(result.ends_with(".planview/plan.json"));
    }
}
