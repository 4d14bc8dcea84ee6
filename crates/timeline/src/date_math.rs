//! Calendar arithmetic used by the timeline layout.
//!
//! All values are naive calendar dates. Instants are only produced at
//! the two normalization points: midnight for range starts and
//! 23:59:59.999 for inclusive range ends.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Milliseconds in one calendar day.
pub const DAY_MS: i64 = 86_400_000;

/// Return the Monday on or before `date` (ISO week start).
///
/// Sunday maps to the Monday six days earlier.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as i64;
    add_days(date, -back)
}

/// Return the Sunday closing the ISO week that contains `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    add_days(start_of_week(date), 6)
}

/// First calendar day of `date`'s month.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last calendar day of `date`'s month.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = start_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next_first) => add_days(next_first, -1),
        // December of the last representable year
        None => NaiveDate::MAX,
    }
}

/// Step `date` by `n` calendar days, saturating at the representable range.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    let step = Days::new(n.unsigned_abs());
    if n >= 0 {
        date.checked_add_days(step).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(step).unwrap_or(NaiveDate::MIN)
    }
}

/// Step `date` by `n` calendar months.
///
/// The day of month is clamped to the target month's length, so
/// Jan 31 + 1 month is Feb 28 (or Feb 29 in a leap year).
pub fn add_months(date: NaiveDate, n: i32) -> NaiveDate {
    let step = Months::new(n.unsigned_abs());
    if n >= 0 {
        date.checked_add_months(step).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_months(step).unwrap_or(NaiveDate::MIN)
    }
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on `date`, used for inclusive range ends.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let start = start_of_day(date);
    start
        .checked_add_signed(TimeDelta::milliseconds(DAY_MS - 1))
        .unwrap_or(start)
}

/// Signed milliseconds from `from` to `to`.
pub fn millis_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    to.signed_duration_since(from).num_milliseconds()
}
