//! Health factor calculation and condition resolution.
//!
//! Pure logic -- no database access. The caller loads the asset and its
//! open-issue count, passes them in together with `now`, and decides what to
//! persist from the returned [`ConditionResolution`].
//!
//! Age uses a 365.25-day year and is rounded to one decimal. This is a
//! deliberate approximation that existing age thresholds are calibrated
//! against; do not replace it with calendar-accurate arithmetic.

use chrono::Duration;
use serde::Serialize;

use crate::condition::{
    is_under_maintenance, AssetCondition, MaintenanceReason, RiskLevel, STATUS_UNDER_MAINTENANCE,
};
use crate::types::Timestamp;

/// Seconds in a 365.25-day year.
const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Cut-offs used by the factor calculator and the resolver.
///
/// Injected at construction so alternate sets can be tested without touching
/// shared state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthThresholds {
    /// Age at which an asset is sent to maintenance.
    pub maintenance_age_years: f64,
    /// Age at which an asset is considered critical.
    pub critical_age_years: f64,
    /// Open issues at which an asset is sent to maintenance.
    pub maintenance_issue_count: i64,
    /// Open issues at which an asset is considered critical.
    pub critical_issue_count: i64,
    /// Open issues at which an asset is considered poor.
    pub poor_issue_count: i64,
    /// Days before expiry at which a warranty counts as expiring.
    pub warranty_expiring_days: i64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            maintenance_age_years: 5.0,
            critical_age_years: 3.0,
            maintenance_issue_count: 8,
            critical_issue_count: 5,
            poor_issue_count: 3,
            warranty_expiring_days: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Factors
// ---------------------------------------------------------------------------

/// The subset of an asset row the calculator reads.
#[derive(Debug, Clone)]
pub struct HealthInputs {
    pub purchase_date: Option<Timestamp>,
    pub warranty_expiry: Option<Timestamp>,
    pub current_condition: AssetCondition,
    pub open_issues_count: i64,
}

/// Signals derived from one asset snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthFactors {
    pub age_years: f64,
    pub open_issues_count: i64,
    pub warranty_expiring: bool,
    pub warranty_expired: bool,
    pub current_condition: AssetCondition,
}

/// Compute the factor set for an asset at `now`.
pub fn compute_factors(
    inputs: &HealthInputs,
    now: Timestamp,
    thresholds: &HealthThresholds,
) -> HealthFactors {
    let age_years = inputs
        .purchase_date
        .map(|purchased| age_in_years(purchased, now))
        .unwrap_or(0.0);

    let expiring_horizon = now + Duration::days(thresholds.warranty_expiring_days);
    let (warranty_expiring, warranty_expired) = match inputs.warranty_expiry {
        Some(expiry) => (expiry > now && expiry <= expiring_horizon, expiry < now),
        None => (false, false),
    };

    HealthFactors {
        age_years,
        open_issues_count: inputs.open_issues_count.max(0),
        warranty_expiring,
        warranty_expired,
        current_condition: inputs.current_condition,
    }
}

/// Elapsed years since `purchased`, rounded to one decimal.
///
/// Purchase dates in the future count as age zero.
fn age_in_years(purchased: Timestamp, now: Timestamp) -> f64 {
    let elapsed_secs = now.signed_duration_since(purchased).num_seconds().max(0) as f64;
    let years = elapsed_secs / SECONDS_PER_YEAR;
    (years * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of resolving a factor set against the asset's current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionResolution {
    pub recommended_condition: AssetCondition,
    pub recommended_status: String,
    pub maintenance_reason: Option<MaintenanceReason>,
    pub risk_level: RiskLevel,
    pub needs_update: bool,
    pub can_report_issues: bool,
}

impl ConditionResolution {
    /// Whether applying this resolution moves the asset into maintenance.
    pub fn enters_maintenance(&self, current_status: &str) -> bool {
        self.recommended_condition.is_under_maintenance() && !is_under_maintenance(current_status)
    }
}

/// Rule-based resolver mapping health factors to a recommended condition.
#[derive(Debug, Clone, Default)]
pub struct ConditionResolver {
    thresholds: HealthThresholds,
}

impl ConditionResolver {
    pub fn new(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    /// Compute factors for `inputs` using this resolver's thresholds.
    pub fn factors(&self, inputs: &HealthInputs, now: Timestamp) -> HealthFactors {
        compute_factors(inputs, now, &self.thresholds)
    }

    /// Resolve the recommended condition and status.
    ///
    /// Rules run in a fixed order and later rules override earlier ones:
    /// age, open issues, warranty tiebreak, then maintenance stickiness.
    pub fn resolve(&self, factors: &HealthFactors, current_status: &str) -> ConditionResolution {
        let t = &self.thresholds;
        let mut condition = AssetCondition::Excellent;
        let mut risk = RiskLevel::Low;
        let mut reason = None;

        if factors.age_years >= t.maintenance_age_years {
            condition = AssetCondition::UnderMaintenance;
            reason = Some(MaintenanceReason::Age);
            risk = RiskLevel::Critical;
        } else if factors.age_years >= t.critical_age_years {
            condition = AssetCondition::Critical;
            risk = RiskLevel::High;
        }

        let issues = factors.open_issues_count;
        if issues >= t.maintenance_issue_count {
            condition = AssetCondition::UnderMaintenance;
            reason = Some(MaintenanceReason::Issues);
            risk = RiskLevel::Critical;
        } else if issues >= t.critical_issue_count {
            if condition != AssetCondition::UnderMaintenance {
                condition = AssetCondition::Critical;
                risk = RiskLevel::High;
            }
        } else if issues >= t.poor_issue_count
            && !matches!(
                condition,
                AssetCondition::UnderMaintenance | AssetCondition::Critical
            )
        {
            condition = AssetCondition::Poor;
            risk = RiskLevel::Medium;
        }

        // Weak tiebreak: only fires when nothing else did.
        if factors.warranty_expired && condition == AssetCondition::Excellent {
            condition = AssetCondition::Good;
        }

        // Leaving maintenance is a manual action, never an automatic one.
        if is_under_maintenance(current_status) && condition != AssetCondition::UnderMaintenance {
            condition = AssetCondition::UnderMaintenance;
            reason = Some(MaintenanceReason::CurrentlyUnderMaintenance);
        }

        let recommended_status = if condition.is_under_maintenance() {
            STATUS_UNDER_MAINTENANCE.to_string()
        } else {
            current_status.to_string()
        };

        ConditionResolution {
            needs_update: current_status != recommended_status,
            can_report_issues: !condition.is_under_maintenance(),
            recommended_condition: condition,
            recommended_status,
            maintenance_reason: reason,
            risk_level: risk,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
