//! Operator-driven maintenance start and completion.
//!
//! Completion is the only path out of `under_maintenance`; health checks
//! never clear it. Both actions audit, and starting notifies the same
//! recipients as an automatic transition.

use std::sync::Arc;

use assetwatch_core::audit::{action_types, Actor, AuditSeverity};
use assetwatch_core::condition::{
    is_under_maintenance, AssetCondition, STATUS_UNDER_MAINTENANCE, VALID_STATUSES,
};
use assetwatch_core::error::CoreError;
use assetwatch_core::roles::MAINTENANCE_RECIPIENT_ROLES;
use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::asset::{
    Asset, AssetHealthUpdate, CompleteMaintenance, MaintenanceEntry,
};
use serde_json::json;

use crate::audit::{AuditRecord, AuditRecorder};
use crate::dispatcher::NotificationDispatcher;
use crate::error::LifecycleError;
use crate::store::LifecycleStore;
use crate::templates;
use crate::transitioner::notify_all;

/// Reason stored when an operator starts maintenance without giving one.
pub const DEFAULT_MANUAL_REASON: &str = "manual";

#[derive(Clone)]
pub struct MaintenanceActions {
    store: Arc<dyn LifecycleStore>,
    dispatcher: NotificationDispatcher,
    audit: AuditRecorder,
}

impl MaintenanceActions {
    pub fn new(
        store: Arc<dyn LifecycleStore>,
        dispatcher: NotificationDispatcher,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            store,
            dispatcher,
            audit,
        }
    }

    async fn load(&self, asset_id: DbId) -> Result<Asset, LifecycleError> {
        self.store
            .find_asset(asset_id)
            .await?
            .ok_or(LifecycleError::Core(CoreError::NotFound {
                entity: "Asset",
                id: asset_id,
            }))
    }

    /// Place an asset in maintenance and return the updated row.
    pub async fn start_maintenance(
        &self,
        asset_id: DbId,
        actor: Actor,
        reason: Option<String>,
        now: Timestamp,
    ) -> Result<Asset, LifecycleError> {
        let asset = self.load(asset_id).await?;
        if is_under_maintenance(&asset.status) {
            return Err(CoreError::Conflict(format!(
                "Asset {asset_id} is already under maintenance"
            ))
            .into());
        }

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_MANUAL_REASON.to_string());
        let update = AssetHealthUpdate {
            condition: AssetCondition::UnderMaintenance.as_str().to_string(),
            status: STATUS_UNDER_MAINTENANCE.to_string(),
            last_health_check: None,
            maintenance: Some(MaintenanceEntry {
                reason: reason.clone(),
                started_at: now,
            }),
        };
        if !self.store.apply_health_update(asset_id, &update).await? {
            // Lost a race: the asset was deleted or entered maintenance meanwhile.
            self.load(asset_id).await?;
            return Err(CoreError::Conflict(format!(
                "Asset {asset_id} is already under maintenance"
            ))
            .into());
        }
        tracing::info!(asset_id, actor = %actor.label(), reason = %reason, "Maintenance started");

        let template = templates::asset_maintenance(&asset, &reason, now);
        if let Err(e) = notify_all(
            &self.dispatcher,
            &asset,
            MAINTENANCE_RECIPIENT_ROLES,
            &template,
            now,
        )
        .await
        {
            tracing::error!(asset_id, error = %e, "Failed to send maintenance notification");
        }

        self.audit_best_effort(AuditRecord {
            organization_id: asset.organization_id,
            asset_id,
            actor,
            action: action_types::MAINTENANCE_STARTED,
            description: format!("Maintenance started on {}", asset.asset_code),
            details: json!({
                "before": { "condition": asset.condition, "status": asset.status },
                "reason": reason,
            }),
            severity: AuditSeverity::Medium,
            at: now,
        })
        .await;

        self.load(asset_id).await
    }

    /// Take an asset out of maintenance into `condition`/`status`.
    pub async fn complete_maintenance(
        &self,
        asset_id: DbId,
        actor: Actor,
        condition: AssetCondition,
        status: &str,
        now: Timestamp,
    ) -> Result<Asset, LifecycleError> {
        if condition.is_under_maintenance() || is_under_maintenance(status) {
            return Err(CoreError::Validation(
                "Completing maintenance must leave the under_maintenance state".into(),
            )
            .into());
        }
        if !VALID_STATUSES.contains(&status) {
            return Err(CoreError::Validation(format!("Unknown asset status: '{status}'")).into());
        }

        let asset = self.load(asset_id).await?;
        if !is_under_maintenance(&asset.status) {
            return Err(CoreError::Conflict(format!(
                "Asset {asset_id} is not under maintenance"
            ))
            .into());
        }

        let input = CompleteMaintenance {
            condition: condition.as_str().to_string(),
            status: status.to_string(),
            completed_at: now,
        };
        // The row left maintenance between the load and the update.
        if !self.store.complete_maintenance(asset_id, &input).await? {
            return Err(CoreError::Conflict(format!(
                "Asset {asset_id} is not under maintenance"
            ))
            .into());
        }
        tracing::info!(asset_id, actor = %actor.label(), condition = %condition, status, "Maintenance completed");

        let days_in_maintenance = asset
            .maintenance_start_date
            .map(|start| (now - start).num_days());
        self.audit_best_effort(AuditRecord {
            organization_id: asset.organization_id,
            asset_id,
            actor,
            action: action_types::MAINTENANCE_COMPLETED,
            description: format!("Maintenance completed on {}", asset.asset_code),
            details: json!({
                "after": { "condition": condition, "status": status },
                "maintenance_reason": asset.maintenance_reason,
                "days_in_maintenance": days_in_maintenance,
            }),
            severity: AuditSeverity::Low,
            at: now,
        })
        .await;

        self.load(asset_id).await
    }

    async fn audit_best_effort(&self, record: AuditRecord) {
        let asset_id = record.asset_id;
        let action = record.action;
        if let Err(e) = self.audit.record(record).await {
            tracing::error!(asset_id, action, error = %e, "Failed to record audit entry");
        }
    }
}
