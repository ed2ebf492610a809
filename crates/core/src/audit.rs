//! Audit trail constants and helpers for lifecycle transitions.
//!
//! This module lives in `core` (zero internal deps) so the engine, the API
//! and the worker agree on action tags and severity mapping.

use serde::{Deserialize, Serialize};

use crate::condition::RiskLevel;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action tags for audit entries written by the lifecycle engine.
pub mod action_types {
    /// Automated condition/status change applied by a health check.
    pub const HEALTH_TRANSITION: &str = "asset_health_transition";
    /// An operator manually placed an asset in maintenance.
    pub const MAINTENANCE_STARTED: &str = "asset_maintenance_started";
    /// An operator manually completed maintenance.
    pub const MAINTENANCE_COMPLETED: &str = "asset_maintenance_completed";
}

/// Resource type recorded for asset audit entries.
pub const RESOURCE_ASSET: &str = "asset";

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity attached to an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditSeverity {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Severity for an automated transition: `high` for critical risk, else `medium`.
pub fn severity_for_risk(risk: RiskLevel) -> AuditSeverity {
    match risk {
        RiskLevel::Critical => AuditSeverity::High,
        _ => AuditSeverity::Medium,
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Sentinel label recorded for automated actions.
pub const SYSTEM_ACTOR: &str = "system";

/// Who performed an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    System,
    User(DbId),
}

impl Actor {
    /// Map an optional acting user to an actor; `None` means the scheduler.
    pub fn from_user(user_id: Option<DbId>) -> Self {
        user_id.map_or(Self::System, Self::User)
    }

    /// The user id stored in `audit_logs.actor_user_id` (`NULL` for system).
    pub fn user_id(&self) -> Option<DbId> {
        match self {
            Self::System => None,
            Self::User(id) => Some(*id),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::System => SYSTEM_ACTOR.to_string(),
            Self::User(id) => format!("user:{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
