//! Calendar-day helpers in an organization's configured UTC offset.
//!
//! "Today" for dedup windows and warranty ranges is the local calendar day,
//! not the UTC day. All helpers take and return UTC timestamps.

use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::types::Timestamp;

/// The local calendar date of `now`.
pub fn local_date(now: Timestamp, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// UTC instant at which the local calendar day containing `now` begins.
pub fn start_of_local_day(now: Timestamp, offset: FixedOffset) -> Timestamp {
    local_midnight(local_date(now, offset), offset)
}

/// UTC instant of local midnight on `date`.
pub fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Timestamp {
    local_instant(date, NaiveTime::MIN, offset)
}

/// UTC instant of `time` on local `date`.
///
/// A fixed offset has no gaps or folds, so the mapping is always unique.
pub fn local_instant(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> Timestamp {
    let local = date.and_time(time);
    let shifted = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    chrono::Utc.from_utc_datetime(&shifted)
}

/// Whole local calendar days from `from` to `to` (negative if `to` is earlier).
pub fn calendar_days_between(from: Timestamp, to: Timestamp, offset: FixedOffset) -> i64 {
    (local_date(to, offset) - local_date(from, offset)).num_days()
}
