//! Asset condition, operational status, and risk classification.
//!
//! Condition is a closed set owned by the lifecycle engine. Status is an open
//! operational flag shared with the CRUD layer; the engine only ever writes
//! [`STATUS_UNDER_MAINTENANCE`] on its own and otherwise preserves the value
//! it found.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_AVAILABLE: &str = "available";
pub const STATUS_IN_USE: &str = "in_use";
pub const STATUS_UNDER_MAINTENANCE: &str = "under_maintenance";
pub const STATUS_RETIRED: &str = "retired";

/// All status values accepted by the `assets.status` check constraint.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_AVAILABLE,
    STATUS_IN_USE,
    STATUS_UNDER_MAINTENANCE,
    STATUS_RETIRED,
];

/// Whether a raw status string is the maintenance status.
pub fn is_under_maintenance(status: &str) -> bool {
    status == STATUS_UNDER_MAINTENANCE
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Qualitative health label for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCondition {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
    UnderMaintenance,
}

impl AssetCondition {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Critical => "critical",
            Self::UnderMaintenance => STATUS_UNDER_MAINTENANCE,
        }
    }

    /// Parse from a string, returning an error for unknown conditions.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            "critical" => Ok(Self::Critical),
            STATUS_UNDER_MAINTENANCE => Ok(Self::UnderMaintenance),
            other => Err(CoreError::Validation(format!(
                "Unknown asset condition: '{other}'"
            ))),
        }
    }

    pub fn is_under_maintenance(&self) -> bool {
        matches!(self, Self::UnderMaintenance)
    }
}

impl std::fmt::Display for AssetCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Risk level
// ---------------------------------------------------------------------------

/// Coarse severity attached to a health analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

// ---------------------------------------------------------------------------
// Maintenance reason
// ---------------------------------------------------------------------------

/// Why the resolver placed an asset in maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceReason {
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "issues")]
    Issues,
    #[serde(rename = "currently under maintenance")]
    CurrentlyUnderMaintenance,
}

impl MaintenanceReason {
    /// Text stored in `assets.maintenance_reason`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Issues => "issues",
            Self::CurrentlyUnderMaintenance => "currently under maintenance",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_string_conversion_is_stable() {
        for condition in [
            AssetCondition::Excellent,
            AssetCondition::Good,
            AssetCondition::Fair,
            AssetCondition::Poor,
            AssetCondition::Critical,
            AssetCondition::UnderMaintenance,
        ] {
            assert_eq!(AssetCondition::from_str(condition.as_str()).unwrap(), condition);
        }
    }

    #[test]
    fn unknown_condition_is_rejected() {
        let err = AssetCondition::from_str("broken").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn maintenance_condition_shares_status_spelling() {
        assert_eq!(AssetCondition::UnderMaintenance.as_str(), STATUS_UNDER_MAINTENANCE);
        assert!(is_under_maintenance(STATUS_UNDER_MAINTENANCE));
        assert!(!is_under_maintenance(STATUS_AVAILABLE));
    }

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn maintenance_reason_serializes_to_stored_text() {
        let json = serde_json::to_value(MaintenanceReason::CurrentlyUnderMaintenance).unwrap();
        assert_eq!(json, "currently under maintenance");
    }
}
