//! Reference date resolution.

use chrono::{Local, NaiveDate};

/// Reference date for status and the today marker: the explicit date, or
/// the local wall-clock date.
pub fn resolve_today(cli_today: Option<NaiveDate>) -> NaiveDate {
    cli_today.unwrap_or_else(|| Local::now().date_naive())
}
