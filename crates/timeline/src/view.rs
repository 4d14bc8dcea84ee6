//! Timeline granularity and its per-view layout policy.
//!
//! Every place that would otherwise branch on daily/weekly/monthly reads
//! the [`ViewPolicy`] table instead: window padding, default spans, the
//! unit stepper and the minimum bar width all live here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::date_math::{
    add_days, add_months, end_of_month, end_of_week, start_of_month, start_of_week,
};
use crate::error::{TimelineError, TimelineResult};

/// Granularity at which the time axis is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineView {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

/// How one axis cell advances to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStep {
    Day,
    Week,
    Month,
}

/// Outward margin added around task dates when inferring the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Pad by a fixed number of days on each side.
    Days(i64),
    /// Extend to whole months, one extra month on each side.
    Months(i32),
}

/// Window used when no task carries a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultSpan {
    /// `[today - before, today + after]`
    Days { before: i64, after: i64 },
    /// `[first of this month, last of the month `ahead` months out]`
    Months { ahead: i32 },
}

/// Layout constants for one [`TimelineView`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPolicy {
    pub step: UnitStep,
    pub padding: Padding,
    pub default_span: DefaultSpan,
    /// Smallest bar width, in percent of the axis, so short tasks stay clickable.
    pub min_width_percent: f64,
}

const DAILY_POLICY: ViewPolicy = ViewPolicy {
    step: UnitStep::Day,
    padding: Padding::Days(7),
    default_span: DefaultSpan::Days {
        before: 7,
        after: 30,
    },
    min_width_percent: 0.5,
};

const WEEKLY_POLICY: ViewPolicy = ViewPolicy {
    step: UnitStep::Week,
    padding: Padding::Days(14),
    default_span: DefaultSpan::Days {
        before: 14,
        after: 60,
    },
    min_width_percent: 1.0,
};

const MONTHLY_POLICY: ViewPolicy = ViewPolicy {
    step: UnitStep::Month,
    padding: Padding::Months(1),
    default_span: DefaultSpan::Months { ahead: 6 },
    min_width_percent: 2.0,
};

impl TimelineView {
    /// All views in cycling order.
    pub const ALL: [TimelineView; 3] = [
        TimelineView::Daily,
        TimelineView::Weekly,
        TimelineView::Monthly,
    ];

    /// The layout policy for this view.
    pub fn policy(self) -> &'static ViewPolicy {
        match self {
            TimelineView::Daily => &DAILY_POLICY,
            TimelineView::Weekly => &WEEKLY_POLICY,
            TimelineView::Monthly => &MONTHLY_POLICY,
        }
    }

    /// Minimum bar width in percent of the axis.
    pub fn min_width_percent(self) -> f64 {
        self.policy().min_width_percent
    }

    /// The unit stepper for this view.
    pub fn step(self) -> UnitStep {
        self.policy().step
    }

    /// Cycle to the next view (daily, weekly, monthly, daily, ...).
    pub fn next(self) -> Self {
        match self {
            TimelineView::Daily => TimelineView::Weekly,
            TimelineView::Weekly => TimelineView::Monthly,
            TimelineView::Monthly => TimelineView::Daily,
        }
    }

    /// Returns the string representation used in plan files and flags
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineView::Daily => "daily",
            TimelineView::Weekly => "weekly",
            TimelineView::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for TimelineView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimelineView {
    type Err = TimelineError;

    fn from_str(s: &str) -> TimelineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(TimelineView::Daily),
            "weekly" | "week" => Ok(TimelineView::Weekly),
            "monthly" | "month" => Ok(TimelineView::Monthly),
            _ => Err(TimelineError::InvalidView {
                value: s.to_string(),
            }),
        }
    }
}

impl UnitStep {
    /// Anchor of the unit containing `date`.
    pub fn align(self, date: NaiveDate) -> NaiveDate {
        match self {
            UnitStep::Day => date,
            UnitStep::Week => start_of_week(date),
            UnitStep::Month => start_of_month(date),
        }
    }

    /// Anchor of the unit following the one anchored at `anchor`.
    pub fn next(self, anchor: NaiveDate) -> NaiveDate {
        match self {
            UnitStep::Day => add_days(anchor, 1),
            UnitStep::Week => add_days(anchor, 7),
            UnitStep::Month => add_months(anchor, 1),
        }
    }

    /// Last calendar day covered by the unit anchored at `anchor`.
    pub fn last_day(self, anchor: NaiveDate) -> NaiveDate {
        match self {
            UnitStep::Day => anchor,
            UnitStep::Week => end_of_week(anchor),
            UnitStep::Month => end_of_month(anchor),
        }
    }

    /// Header label for the unit anchored at `anchor`.
    ///
    /// Weekly labels drop the month from the end date when the week
    /// stays inside one month: `Jun 3 – 9` but `May 27 – Jun 2`.
    pub fn label(self, anchor: NaiveDate) -> String {
        match self {
            UnitStep::Day => anchor.format("%b %-d").to_string(),
            UnitStep::Week => {
                let end = self.last_day(anchor);
                let end_label = if start_of_month(end) == start_of_month(anchor) {
                    end.format("%-d").to_string()
                } else {
                    end.format("%b %-d").to_string()
                };
                format!("{} \u{2013} {}", anchor.format("%b %-d"), end_label)
            }
            UnitStep::Month => anchor.format("%b %Y").to_string(),
        }
    }
}
