//! Visual status of a task relative to today.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Task;

/// Status used to choose a task's bar colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Future,
    InProgress,
    Overdue,
    NoDate,
}

impl TaskStatus {
    /// Returns the string representation used in output
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Future => "future",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Overdue => "overdue",
            TaskStatus::NoDate => "no_date",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify `task` against `today`.
///
/// Overdue is checked before in-progress, so a task whose window already
/// closed is never shown as active. A task with an end date but no start
/// date that has not ended yet is future.
pub fn classify(task: &Task, today: NaiveDate) -> TaskStatus {
    let Some(end) = task.end_date else {
        return TaskStatus::NoDate;
    };
    if end < today {
        return TaskStatus::Overdue;
    }
    match task.start_date {
        Some(start) if start <= today => TaskStatus::InProgress,
        _ => TaskStatus::Future,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 15)
    }

    #[test]
    fn test_overdue_when_end_before_today() {
        let task = Task::new("t1", "x").with_dates(date(2024, 5, 20), date(2024, 6, 1));
        assert_eq!(classify(&task, today()), TaskStatus::Overdue);
    }

    #[test]
    fn test_overdue_without_start_date() {
        let task = Task::new("t1", "x").with_end(date(2024, 6, 1));
        assert_eq!(classify(&task, today()), TaskStatus::Overdue);
    }

    #[test]
    fn test_in_progress_when_today_inside_range() {
        let task = Task::new("t1", "x").with_dates(date(2024, 6, 10), date(2024, 6, 20));
        assert_eq!(classify(&task, today()), TaskStatus::InProgress);
    }

    #[test]
    fn test_in_progress_on_boundaries() {
        let starts_today = Task::new("t1", "x").with_dates(today(), date(2024, 6, 20));
        let ends_today = Task::new("t2", "y").with_dates(date(2024, 6, 1), today());
        assert_eq!(classify(&starts_today, today()), TaskStatus::InProgress);
        assert_eq!(classify(&ends_today, today()), TaskStatus::InProgress);
    }

    #[test]
    fn test_future_when_start_after_today() {
        let task = Task::new("t1", "x").with_dates(date(2024, 7, 1), date(2024, 7, 5));
        assert_eq!(classify(&task, today()), TaskStatus::Future);
    }

    #[test]
    fn test_future_when_only_end_is_ahead() {
        let task = Task::new("t1", "x").with_end(date(2024, 7, 5));
        assert_eq!(classify(&task, today()), TaskStatus::Future);
    }

    #[test]
    fn test_no_date_without_end() {
        let undated = Task::new("t1", "x");
        let start_only = Task::new("t2", "y").with_start(date(2024, 7, 1));
        assert_eq!(classify(&undated, today()), TaskStatus::NoDate);
        assert_eq!(classify(&start_only, today()), TaskStatus::NoDate);
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::NoDate.to_string(), "no_date");
    }
}
