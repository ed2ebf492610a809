use assetwatch_core::error::CoreError;
use chrono::{NaiveTime, Weekday};

use crate::schedule::Schedule;

/// Fire times for the periodic jobs, in the organization's local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub health_check: Schedule,
    pub overdue_maintenance: Schedule,
    pub warranty_expired: Schedule,
    pub warranty_expiring: Schedule,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            health_check: Schedule::Daily { at: hm(2, 0) },
            overdue_maintenance: Schedule::Daily { at: hm(8, 0) },
            warranty_expired: Schedule::Daily { at: hm(9, 0) },
            warranty_expiring: Schedule::Weekly {
                weekday: Weekday::Mon,
                at: hm(9, 30),
            },
        }
    }
}

impl WorkerConfig {
    /// Load schedules from environment variables with defaults.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `HEALTH_CHECK_AT`           | `02:00` |
    /// | `OVERDUE_CHECK_AT`          | `08:00` |
    /// | `WARRANTY_EXPIRED_AT`       | `09:00` |
    /// | `WARRANTY_EXPIRING_AT`      | `09:30` |
    /// | `WARRANTY_EXPIRING_WEEKDAY` | `Mon`   |
    pub fn from_env() -> Result<Self, CoreError> {
        let defaults = Self::default();
        Ok(Self {
            health_check: daily_from_env("HEALTH_CHECK_AT", defaults.health_check)?,
            overdue_maintenance: daily_from_env("OVERDUE_CHECK_AT", defaults.overdue_maintenance)?,
            warranty_expired: daily_from_env("WARRANTY_EXPIRED_AT", defaults.warranty_expired)?,
            warranty_expiring: Schedule::Weekly {
                weekday: match std::env::var("WARRANTY_EXPIRING_WEEKDAY") {
                    Ok(raw) => parse_weekday("WARRANTY_EXPIRING_WEEKDAY", &raw)?,
                    Err(_) => Weekday::Mon,
                },
                at: match std::env::var("WARRANTY_EXPIRING_AT") {
                    Ok(raw) => parse_time("WARRANTY_EXPIRING_AT", &raw)?,
                    Err(_) => hm(9, 30),
                },
            },
        })
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn daily_from_env(key: &str, default: Schedule) -> Result<Schedule, CoreError> {
    match std::env::var(key) {
        Ok(raw) => Ok(Schedule::Daily {
            at: parse_time(key, &raw)?,
        }),
        Err(_) => Ok(default),
    }
}

/// Parse `HH:MM` local time.
pub fn parse_time(key: &str, raw: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| CoreError::Validation(format!("{key} must be HH:MM, got '{raw}'")))
}

/// Parse a weekday name (`Mon`, `monday`, ...).
pub fn parse_weekday(key: &str, raw: &str) -> Result<Weekday, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("{key} must be a weekday, got '{raw}'")))
}
