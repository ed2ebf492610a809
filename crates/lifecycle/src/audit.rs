//! Append-only audit entries for asset lifecycle changes.

use std::sync::Arc;

use assetwatch_core::audit::{action_types, severity_for_risk, Actor, AuditSeverity, RESOURCE_ASSET};
use assetwatch_core::health::{ConditionResolution, HealthFactors};
use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::audit::CreateAuditLog;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::store::LifecycleStore;

/// One audited change to an asset.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub organization_id: DbId,
    pub asset_id: DbId,
    pub actor: Actor,
    pub action: &'static str,
    pub description: String,
    pub details: Value,
    pub severity: AuditSeverity,
    pub at: Timestamp,
}

/// Condition and status of an asset at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct StateSnapshot<'a> {
    pub condition: &'a str,
    pub status: &'a str,
}

impl StateSnapshot<'_> {
    fn to_json(self) -> Value {
        json!({ "condition": self.condition, "status": self.status })
    }
}

#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn LifecycleStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn LifecycleStore>) -> Self {
        Self { store }
    }

    pub async fn record(&self, record: AuditRecord) -> StoreResult<DbId> {
        let input = CreateAuditLog {
            organization_id: record.organization_id,
            actor: record.actor.label(),
            actor_user_id: record.actor.user_id(),
            action: record.action.to_string(),
            resource_type: RESOURCE_ASSET.to_string(),
            resource_id: record.asset_id,
            description: record.description,
            details: record.details,
            severity: record.severity.as_str().to_string(),
            created_at: record.at,
        };
        self.store.create_audit_log(&input).await
    }

    /// Record an automated health transition with its triggering factors.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_transition(
        &self,
        organization_id: DbId,
        asset_id: DbId,
        actor: Actor,
        before: StateSnapshot<'_>,
        factors: &HealthFactors,
        resolution: &ConditionResolution,
        at: Timestamp,
    ) -> StoreResult<DbId> {
        let after = StateSnapshot {
            condition: resolution.recommended_condition.as_str(),
            status: &resolution.recommended_status,
        };
        let description = format!(
            "Health check moved asset from {}/{} to {}/{}",
            before.condition, before.status, after.condition, after.status
        );
        self.record(AuditRecord {
            organization_id,
            asset_id,
            actor,
            action: action_types::HEALTH_TRANSITION,
            description,
            details: json!({
                "before": before.to_json(),
                "after": after.to_json(),
                "factors": factors,
                "risk_level": resolution.risk_level,
                "maintenance_reason": resolution.maintenance_reason,
            }),
            severity: severity_for_risk(resolution.risk_level),
            at,
        })
        .await
    }
}
