//! Calendar-month boundary arithmetic, isolated because the year
//! rollover is easy to get wrong and several consumers depend on the
//! exact window edges.

use chrono::{Datelike, NaiveDate};

/// First day of the current month and first day of the previous month,
/// relative to `today`. The current window is `[current, now)` and the
/// previous window is `[previous, current)`.
pub fn month_windows(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let current = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let previous = if today.month() == 1 {
        NaiveDate::from_ymd_opt(today.year() - 1, 12, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() - 1, 1)
    }
    .unwrap_or(current);
    (current, previous)
}
