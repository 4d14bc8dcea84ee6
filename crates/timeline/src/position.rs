//! Mapping dates onto the time axis as percentages.
//!
//! The axis runs from the first unit's anchor (midnight) to the end of the
//! last unit's final day (23:59:59.999). Header cells, task bars and the
//! today marker all share this scale so they line up exactly.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::date_math::{end_of_day, millis_between, start_of_day};
use crate::models::Task;
use crate::units::TimeUnit;
use crate::view::TimelineView;
use crate::window::Window;

/// Horizontal placement of a task bar, in percent of the axis width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskBarGeometry {
    pub left_percent: f64,
    pub width_percent: f64,
}

impl TaskBarGeometry {
    /// Right edge of the bar in percent.
    pub fn right_percent(&self) -> f64 {
        self.left_percent + self.width_percent
    }
}

/// Horizontal placement of one header cell, in percent of the axis width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitGeometry {
    pub left_percent: f64,
    pub width_percent: f64,
}

/// The addressable time axis for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    view: TimelineView,
    origin: NaiveDateTime,
    end: NaiveDateTime,
    total_ms: f64,
}

impl Axis {
    /// Build the axis for `units`, falling back to the raw window bounds
    /// when no units were supplied.
    ///
    /// The origin is the first unit's anchor, i.e. the window start aligned
    /// down to a unit boundary, and the end is the last unit's final
    /// millisecond. Header cells and task bars therefore share one scale.
    pub fn new(window: &Window, view: TimelineView, units: &[TimeUnit]) -> Self {
        let first = units.first().map_or(window.start, |u| u.date);
        let last_day = units
            .last()
            .map_or(window.end, |u| u.last_day(view))
            .max(first);

        let origin = start_of_day(first);
        let end = end_of_day(last_day);
        let total_ms = millis_between(origin, end) as f64;

        Self {
            view,
            origin,
            end,
            total_ms,
        }
    }

    /// Axis length in milliseconds.
    pub fn total_ms(&self) -> f64 {
        self.total_ms
    }

    /// First instant on the axis.
    pub fn origin(&self) -> NaiveDateTime {
        self.origin
    }

    /// Last instant on the axis.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Offset of `instant` from the origin, clamped into `[0, total_ms]`.
    fn clamped_offset(&self, instant: NaiveDateTime) -> f64 {
        (millis_between(self.origin, instant) as f64).clamp(0.0, self.total_ms)
    }

    /// Bar geometry for `task`, or `None` when it lacks either date.
    ///
    /// Tasks reaching outside the axis are truncated at the edges. Bars
    /// narrower than the view's minimum are widened, and shifted left if
    /// needed so they never overflow the right edge.
    pub fn bar(&self, task: &Task) -> Option<TaskBarGeometry> {
        let (start, end) = task.date_range()?;
        Some(self.bar_for_range(start, end))
    }

    /// Bar geometry for an inclusive calendar range.
    pub fn bar_for_range(&self, start: NaiveDate, end: NaiveDate) -> TaskBarGeometry {
        let start_offset = self.clamped_offset(start_of_day(start));
        let end_offset = self.clamped_offset(end_of_day(end)).max(start_offset);

        let min_width = self.view.min_width_percent();
        let width_percent = ((end_offset - start_offset) / self.total_ms * 100.0).max(min_width);
        let left_percent = (start_offset / self.total_ms * 100.0)
            .min(100.0 - width_percent)
            .max(0.0);

        TaskBarGeometry {
            left_percent,
            width_percent,
        }
    }

    /// Cell geometry for each of `units`, on the same scale as task bars.
    pub fn unit_geometry(&self, units: &[TimeUnit]) -> Vec<UnitGeometry> {
        units
            .iter()
            .map(|unit| {
                let start = self.clamped_offset(start_of_day(unit.date));
                let end = self.clamped_offset(end_of_day(unit.last_day(self.view)));
                UnitGeometry {
                    left_percent: start / self.total_ms * 100.0,
                    width_percent: (end - start) / self.total_ms * 100.0,
                }
            })
            .collect()
    }

    /// Position of the middle of `today` on the axis, or `None` when
    /// today falls outside it.
    pub fn today_marker_percent(&self, today: NaiveDate) -> Option<f64> {
        let day_start = start_of_day(today);
        if day_start < self.origin || day_start > self.end {
            return None;
        }
        let midday = (self.clamped_offset(day_start) + self.clamped_offset(end_of_day(today))) / 2.0;
        Some(midday / self.total_ms * 100.0)
    }
}

/// Map a single task onto the axis described by `window`, `view` and `units`.
pub fn map_task(
    task: &Task,
    window: &Window,
    view: TimelineView,
    units: &[TimeUnit],
) -> Option<TaskBarGeometry> {
    Axis::new(window, view, units).bar(task)
}
