//! Header cell generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::view::TimelineView;
use crate::window::Window;

/// One cell of the time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeUnit {
    /// Anchor date: the day, the Monday of the ISO week, or the first of the month.
    pub date: NaiveDate,
    pub label: String,
}

impl TimeUnit {
    /// Last calendar day covered by this unit at `view` granularity.
    pub fn last_day(&self, view: TimelineView) -> NaiveDate {
        view.step().last_day(self.date)
    }
}

/// Build the ordered, gap-free header cells spanning `window`.
///
/// The first anchor is `window.start` aligned to the view's unit; cells
/// continue until an anchor passes `window.end`, so the last cell always
/// reaches at least to the window end.
pub fn generate_units(window: &Window, view: TimelineView) -> Vec<TimeUnit> {
    let step = view.step();
    let mut units = Vec::new();
    let mut anchor = step.align(window.start);

    while anchor <= window.end {
        units.push(TimeUnit {
            date: anchor,
            label: step.label(anchor),
        });
        let next = step.next(anchor);
        if next <= anchor {
            // Saturated at the end of the calendar
            break;
        }
        anchor = next;
    }

    units
}
