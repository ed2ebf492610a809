use std::str::FromStr;

use assetwatch_core::error::CoreError;
use assetwatch_core::health::HealthThresholds;
use chrono::{FixedOffset, Offset, Utc};

/// Upper bound for every day-based window (ten years).
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Engine configuration loaded from environment variables.
///
/// All fields have defaults matching the production rule set. The value is
/// immutable once built and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Resolver and factor thresholds.
    pub thresholds: HealthThresholds,
    /// Days an asset may stay in maintenance before escalation (default: `2`).
    pub overdue_grace_days: i64,
    /// Rolling window for re-alerting on expiring warranties (default: `7`).
    pub warranty_realert_days: i64,
    /// Offset defining the organization's calendar day (default: UTC).
    pub utc_offset: FixedOffset,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            thresholds: HealthThresholds::default(),
            overdue_grace_days: 2,
            warranty_realert_days: 7,
            utc_offset: Utc.fix(),
        }
    }
}

impl LifecycleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default |
    /// |----------------------------------|---------|
    /// | `HEALTH_MAINTENANCE_AGE_YEARS`   | `5.0`   |
    /// | `HEALTH_CRITICAL_AGE_YEARS`      | `3.0`   |
    /// | `HEALTH_MAINTENANCE_ISSUES`      | `8`     |
    /// | `HEALTH_CRITICAL_ISSUES`         | `5`     |
    /// | `HEALTH_POOR_ISSUES`             | `3`     |
    /// | `WARRANTY_EXPIRING_DAYS`         | `30`    |
    /// | `WARRANTY_REALERT_DAYS`          | `7`     |
    /// | `MAINTENANCE_OVERDUE_GRACE_DAYS` | `2`     |
    /// | `ORG_UTC_OFFSET_MINUTES`         | `0`     |
    pub fn from_env() -> Result<Self, CoreError> {
        let defaults = HealthThresholds::default();
        let thresholds = HealthThresholds {
            maintenance_age_years: env_or(
                "HEALTH_MAINTENANCE_AGE_YEARS",
                defaults.maintenance_age_years,
            )?,
            critical_age_years: env_or("HEALTH_CRITICAL_AGE_YEARS", defaults.critical_age_years)?,
            maintenance_issue_count: env_or(
                "HEALTH_MAINTENANCE_ISSUES",
                defaults.maintenance_issue_count,
            )?,
            critical_issue_count: env_or("HEALTH_CRITICAL_ISSUES", defaults.critical_issue_count)?,
            poor_issue_count: env_or("HEALTH_POOR_ISSUES", defaults.poor_issue_count)?,
            warranty_expiring_days: env_or(
                "WARRANTY_EXPIRING_DAYS",
                defaults.warranty_expiring_days,
            )?,
        };

        let offset_minutes: i32 = env_or("ORG_UTC_OFFSET_MINUTES", 0)?;
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            CoreError::Validation(format!(
                "ORG_UTC_OFFSET_MINUTES out of range: {offset_minutes}"
            ))
        })?;

        let config = Self {
            thresholds,
            overdue_grace_days: env_or("MAINTENANCE_OVERDUE_GRACE_DAYS", 2)?,
            warranty_realert_days: env_or("WARRANTY_REALERT_DAYS", 7)?,
            utc_offset,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject threshold sets whose tiers are out of order and day windows
    /// outside `1..=MAX_WINDOW_DAYS` (grace may be `0`).
    pub fn validate(&self) -> Result<(), CoreError> {
        let t = &self.thresholds;
        if t.critical_age_years > t.maintenance_age_years {
            return Err(CoreError::Validation(
                "HEALTH_CRITICAL_AGE_YEARS must not exceed HEALTH_MAINTENANCE_AGE_YEARS".into(),
            ));
        }
        if !(t.poor_issue_count <= t.critical_issue_count
            && t.critical_issue_count <= t.maintenance_issue_count)
        {
            return Err(CoreError::Validation(
                "issue thresholds must satisfy poor <= critical <= maintenance".into(),
            ));
        }
        if self.overdue_grace_days < 0
            || self.warranty_realert_days < 1
            || t.warranty_expiring_days < 1
        {
            return Err(CoreError::Validation(
                "day-based windows must be positive".into(),
            ));
        }
        if self.overdue_grace_days > MAX_WINDOW_DAYS
            || self.warranty_realert_days > MAX_WINDOW_DAYS
            || t.warranty_expiring_days > MAX_WINDOW_DAYS
        {
            return Err(CoreError::Validation(format!(
                "day-based windows must not exceed {MAX_WINDOW_DAYS} days"
            )));
        }
        Ok(())
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, CoreError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Validation(format!("{key} has an invalid value: '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(LifecycleConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_age_thresholds_are_rejected() {
        let mut config = LifecycleConfig::default();
        config.thresholds.critical_age_years = 6.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_issue_thresholds_are_rejected() {
        let mut config = LifecycleConfig::default();
        config.thresholds.poor_issue_count = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_day_windows_are_rejected() {
        let mut config = LifecycleConfig::default();
        config.warranty_realert_days = i64::MAX;
        assert!(config.validate().is_err());

        let mut config = LifecycleConfig::default();
        config.overdue_grace_days = MAX_WINDOW_DAYS + 1;
        assert!(config.validate().is_err());

        let mut config = LifecycleConfig::default();
        config.thresholds.warranty_expiring_days = MAX_WINDOW_DAYS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn ten_year_windows_are_accepted() {
        let mut config = LifecycleConfig::default();
        config.overdue_grace_days = MAX_WINDOW_DAYS;
        config.warranty_realert_days = MAX_WINDOW_DAYS;
        config.thresholds.warranty_expiring_days = MAX_WINDOW_DAYS;
        assert!(config.validate().is_ok());
    }
}
