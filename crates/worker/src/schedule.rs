//! Wall-clock schedules evaluated in the organization's UTC offset.

use std::fmt;

use assetwatch_core::calendar::{local_date, local_instant};
use assetwatch_core::types::Timestamp;
use chrono::{Datelike, Days, FixedOffset, NaiveTime, Weekday};

/// When a periodic job fires, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Every day at `at`.
    Daily { at: NaiveTime },
    /// Once a week on `weekday` at `at`.
    Weekly { weekday: Weekday, at: NaiveTime },
}

impl Schedule {
    /// The first fire time strictly after `now`.
    pub fn next_after(&self, now: Timestamp, offset: FixedOffset) -> Timestamp {
        let today = local_date(now, offset);
        match *self {
            Self::Daily { at } => {
                let candidate = local_instant(today, at, offset);
                if candidate > now {
                    candidate
                } else {
                    local_instant(today + Days::new(1), at, offset)
                }
            }
            Self::Weekly { weekday, at } => {
                let ahead = (7 + weekday.num_days_from_monday()
                    - today.weekday().num_days_from_monday())
                    % 7;
                let candidate = local_instant(today + Days::new(u64::from(ahead)), at, offset);
                if candidate > now {
                    candidate
                } else {
                    local_instant(today + Days::new(u64::from(ahead) + 7), at, offset)
                }
            }
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily { at } => write!(f, "daily at {}", at.format("%H:%M")),
            Self::Weekly { weekday, at } => write!(f, "{weekday} at {}", at.format("%H:%M")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn utc_offset() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn daily_fires_later_today() {
        let schedule = Schedule::Daily { at: hm(9, 0) };
        let next = schedule.next_after(utc(2024, 6, 10, 2, 0), utc_offset());
        assert_eq!(next, utc(2024, 6, 10, 9, 0));
    }

    #[test]
    fn daily_rolls_over_once_passed() {
        let schedule = Schedule::Daily { at: hm(2, 0) };
        let next = schedule.next_after(utc(2024, 6, 10, 9, 0), utc_offset());
        assert_eq!(next, utc(2024, 6, 11, 2, 0));
    }

    #[test]
    fn daily_at_exact_fire_time_moves_to_next_day() {
        let schedule = Schedule::Daily { at: hm(2, 0) };
        let next = schedule.next_after(utc(2024, 6, 10, 2, 0), utc_offset());
        assert_eq!(next, utc(2024, 6, 11, 2, 0));
    }

    #[test]
    fn daily_respects_local_offset() {
        // 02:00 in +05:30 is 20:30 UTC the previous day.
        let offset = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let schedule = Schedule::Daily { at: hm(2, 0) };
        let next = schedule.next_after(utc(2024, 6, 10, 9, 0), offset);
        assert_eq!(next, utc(2024, 6, 10, 20, 30));
    }

    #[test]
    fn weekly_finds_next_weekday() {
        // 2024-06-12 is a Wednesday.
        let schedule = Schedule::Weekly {
            weekday: Weekday::Mon,
            at: hm(9, 30),
        };
        let next = schedule.next_after(utc(2024, 6, 12, 12, 0), utc_offset());
        assert_eq!(next, utc(2024, 6, 17, 9, 30));
    }

    #[test]
    fn weekly_fires_same_day_before_time() {
        let schedule = Schedule::Weekly {
            weekday: Weekday::Mon,
            at: hm(9, 30),
        };
        let next = schedule.next_after(utc(2024, 6, 10, 9, 0), utc_offset());
        assert_eq!(next, utc(2024, 6, 10, 9, 30));
    }

    #[test]
    fn weekly_skips_a_week_after_time() {
        let schedule = Schedule::Weekly {
            weekday: Weekday::Mon,
            at: hm(9, 30),
        };
        let next = schedule.next_after(utc(2024, 6, 10, 10, 0), utc_offset());
        assert_eq!(next, utc(2024, 6, 17, 9, 30));
    }

    #[test]
    fn display_is_human_readable() {
        let weekly = Schedule::Weekly {
            weekday: Weekday::Mon,
            at: hm(9, 30),
        };
        assert_eq!(weekly.to_string(), "Mon at 09:30");
        assert_eq!(Schedule::Daily { at: hm(2, 0) }.to_string(), "daily at 02:00");
    }
}
