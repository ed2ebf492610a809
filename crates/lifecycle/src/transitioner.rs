//! One evaluate-and-apply cycle for a single asset.
//!
//! Steps run strictly in order: compute, persist, notify, audit. Only the
//! persist step can fail the cycle. Notification and audit failures are
//! logged and swallowed, and never undo an applied transition.

use std::sync::Arc;

use assetwatch_core::audit::Actor;
use assetwatch_core::condition::AssetCondition;
use assetwatch_core::health::{ConditionResolution, ConditionResolver, HealthFactors, HealthInputs};
use assetwatch_core::roles::MAINTENANCE_RECIPIENT_ROLES;
use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::asset::{Asset, AssetHealthUpdate, MaintenanceEntry};
use serde::Serialize;

use crate::audit::{AuditRecorder, StateSnapshot};
use crate::dispatcher::NotificationDispatcher;
use crate::error::LifecycleError;
use crate::store::LifecycleStore;
use crate::templates;

/// Full analysis of one asset, returned whether or not anything was written.
#[derive(Debug, Clone, Serialize)]
pub struct AssetHealthReport {
    pub asset_id: DbId,
    pub organization_id: DbId,
    pub asset_code: String,
    pub previous_condition: String,
    pub previous_status: String,
    pub factors: HealthFactors,
    pub resolution: ConditionResolution,
    /// Whether the transition was persisted.
    pub applied: bool,
    pub checked_at: Timestamp,
}

#[derive(Clone)]
pub struct LifecycleTransitioner {
    store: Arc<dyn LifecycleStore>,
    resolver: ConditionResolver,
    dispatcher: NotificationDispatcher,
    audit: AuditRecorder,
}

impl LifecycleTransitioner {
    pub fn new(
        store: Arc<dyn LifecycleStore>,
        resolver: ConditionResolver,
        dispatcher: NotificationDispatcher,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            store,
            resolver,
            dispatcher,
            audit,
        }
    }

    /// Compute factors and the resolved condition for a loaded asset.
    pub async fn analyze(
        &self,
        asset: &Asset,
        now: Timestamp,
    ) -> Result<(HealthFactors, ConditionResolution), LifecycleError> {
        let current_condition = AssetCondition::from_str(&asset.condition)?;
        let open_issues_count = self.store.count_open_issues(asset.id).await?;
        let inputs = HealthInputs {
            purchase_date: asset.purchase_date,
            warranty_expiry: asset.warranty_expiry,
            current_condition,
            open_issues_count,
        };
        let factors = self.resolver.factors(&inputs, now);
        let resolution = self.resolver.resolve(&factors, &asset.status);
        Ok((factors, resolution))
    }

    /// Evaluate one asset and apply the recommended transition if needed.
    ///
    /// Returns `Ok(None)` when the asset does not exist.
    pub async fn evaluate(
        &self,
        asset_id: DbId,
        actor: Actor,
        now: Timestamp,
    ) -> Result<Option<AssetHealthReport>, LifecycleError> {
        let Some(asset) = self.store.find_asset(asset_id).await? else {
            tracing::debug!(asset_id, "Asset not found, nothing to evaluate");
            return Ok(None);
        };

        let (factors, resolution) = self.analyze(&asset, now).await?;
        let mut report = AssetHealthReport {
            asset_id: asset.id,
            organization_id: asset.organization_id,
            asset_code: asset.asset_code.clone(),
            previous_condition: asset.condition.clone(),
            previous_status: asset.status.clone(),
            factors,
            resolution,
            applied: false,
            checked_at: now,
        };

        if !report.resolution.needs_update {
            return Ok(Some(report));
        }

        let entering_maintenance = report.resolution.enters_maintenance(&asset.status);
        let maintenance = if entering_maintenance {
            report
                .resolution
                .maintenance_reason
                .map(|reason| MaintenanceEntry {
                    reason: reason.as_str().to_string(),
                    started_at: now,
                })
        } else {
            None
        };
        let update = AssetHealthUpdate {
            condition: report.resolution.recommended_condition.as_str().to_string(),
            status: report.resolution.recommended_status.clone(),
            last_health_check: Some(now),
            maintenance,
        };

        if !self.store.apply_health_update(asset.id, &update).await? {
            tracing::debug!(asset_id, "Asset changed before update, skipping");
            return Ok(None);
        }
        report.applied = true;

        tracing::info!(
            asset_id,
            organization_id = asset.organization_id,
            from = %asset.status,
            to = %report.resolution.recommended_status,
            risk = report.resolution.risk_level.as_str(),
            "Applied asset health transition"
        );

        if entering_maintenance {
            self.notify_maintenance(&asset, &report.resolution, now).await;
        }

        let before = StateSnapshot {
            condition: &asset.condition,
            status: &asset.status,
        };
        if let Err(e) = self
            .audit
            .record_transition(
                asset.organization_id,
                asset.id,
                actor,
                before,
                &report.factors,
                &report.resolution,
                now,
            )
            .await
        {
            tracing::error!(asset_id, error = %e, "Failed to record audit entry for transition");
        }

        Ok(Some(report))
    }

    async fn notify_maintenance(
        &self,
        asset: &Asset,
        resolution: &ConditionResolution,
        now: Timestamp,
    ) {
        let reason = resolution
            .maintenance_reason
            .map(|r| r.as_str())
            .unwrap_or_default();
        let template = templates::asset_maintenance(asset, reason, now);
        if let Err(e) = notify_all(
            &self.dispatcher,
            asset,
            MAINTENANCE_RECIPIENT_ROLES,
            &template,
            now,
        )
        .await
        {
            tracing::error!(
                asset_id = asset.id,
                error = %e,
                "Failed to send maintenance notification"
            );
        }
    }
}

/// Resolve recipients for `roles` plus the assignee and dispatch `template`.
pub(crate) async fn notify_all(
    dispatcher: &NotificationDispatcher,
    asset: &Asset,
    roles: &[&str],
    template: &templates::NotificationTemplate,
    now: Timestamp,
) -> Result<usize, LifecycleError> {
    let recipients = dispatcher
        .recipients(asset.organization_id, roles, asset.assigned_to)
        .await?;
    Ok(dispatcher
        .dispatch(asset.organization_id, asset.id, &recipients, template, now)
        .await?)
}
