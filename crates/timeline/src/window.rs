//! Visible window inference.
//!
//! The window is derived from the dated tasks and padded outward so the
//! earliest and latest task never sit flush against the axis edge. With
//! no dated tasks the window is anchored on today.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_math::{add_days, add_months, end_of_month, start_of_month};
use crate::models::Task;
use crate::view::{DefaultSpan, Padding, TimelineView};

/// Inclusive calendar range addressable by the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// Create a window, ordering the bounds so `start <= end` always holds.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Number of calendar days covered, inclusive of both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Infer the visible window for `tasks` at `view` granularity.
///
/// Every defined start and end date takes part, including dates of tasks
/// that carry only one of the two.
pub fn infer_window<'a, I>(tasks: I, view: TimelineView, today: NaiveDate) -> Window
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for date in tasks
        .into_iter()
        .flat_map(|task| [task.start_date, task.end_date])
        .flatten()
    {
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(date), max.max(date)),
            None => (date, date),
        });
    }

    let policy = view.policy();
    let window = match bounds {
        None => match policy.default_span {
            DefaultSpan::Days { before, after } => {
                Window::new(add_days(today, -before), add_days(today, after))
            }
            DefaultSpan::Months { ahead } => Window::new(
                start_of_month(today),
                end_of_month(add_months(start_of_month(today), ahead)),
            ),
        },
        Some((min, max)) => match policy.padding {
            Padding::Days(days) => Window::new(add_days(min, -days), add_days(max, days)),
            Padding::Months(months) => Window::new(
                start_of_month(add_months(start_of_month(min), -months)),
                end_of_month(add_months(start_of_month(max), months)),
            ),
        },
    };

    tracing::debug!(
        view = %view,
        from_tasks = bounds.is_some(),
        start = %window.start,
        end = %window.end,
        "inferred timeline window"
    );
    window
}
