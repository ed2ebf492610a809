//! Facade wiring every lifecycle component over one store.
//!
//! The API and the worker hold a single `Arc<LifecycleEngine>`; each method
//! maps 1:1 to a manual trigger or a scheduled job.

use std::sync::Arc;

use assetwatch_core::audit::Actor;
use assetwatch_core::condition::AssetCondition;
use assetwatch_core::health::ConditionResolver;
use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::asset::Asset;
use serde::Serialize;

use crate::audit::AuditRecorder;
use crate::config::LifecycleConfig;
use crate::dispatcher::NotificationDispatcher;
use crate::error::{LifecycleError, StoreError};
use crate::evaluator::{AllOrganizationsResult, BatchResult, ScheduledEvaluator};
use crate::maintenance::MaintenanceActions;
use crate::monitors::{MonitorSummary, OverdueMaintenanceMonitor, WarrantyMonitor};
use crate::store::LifecycleStore;
use crate::transitioner::{AssetHealthReport, LifecycleTransitioner};

/// Whether new issue reports may be filed against an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueReportingDecision {
    pub asset_id: DbId,
    pub can_report_issues: bool,
    pub recommended_condition: AssetCondition,
}

pub struct LifecycleEngine {
    store: Arc<dyn LifecycleStore>,
    config: LifecycleConfig,
    transitioner: LifecycleTransitioner,
    evaluator: ScheduledEvaluator,
    overdue: OverdueMaintenanceMonitor,
    warranty: WarrantyMonitor,
    maintenance: MaintenanceActions,
}

impl LifecycleEngine {
    pub fn new(store: Arc<dyn LifecycleStore>, config: LifecycleConfig) -> Self {
        let dispatcher = NotificationDispatcher::new(Arc::clone(&store), config.utc_offset);
        let audit = AuditRecorder::new(Arc::clone(&store));
        let resolver = ConditionResolver::new(config.thresholds.clone());

        let transitioner = LifecycleTransitioner::new(
            Arc::clone(&store),
            resolver,
            dispatcher.clone(),
            audit.clone(),
        );
        let evaluator = ScheduledEvaluator::new(Arc::clone(&store), transitioner.clone());
        let overdue = OverdueMaintenanceMonitor::new(
            Arc::clone(&store),
            dispatcher.clone(),
            config.overdue_grace_days,
        );
        let warranty = WarrantyMonitor::new(
            Arc::clone(&store),
            dispatcher.clone(),
            config.utc_offset,
            config.thresholds.warranty_expiring_days,
            config.warranty_realert_days,
        );
        let maintenance = MaintenanceActions::new(Arc::clone(&store), dispatcher, audit);

        Self {
            store,
            config,
            transitioner,
            evaluator,
            overdue,
            warranty,
            maintenance,
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    // --- Health checks ---

    /// Evaluate and apply one asset. `None` if the asset does not exist.
    pub async fn check_asset(
        &self,
        asset_id: DbId,
        actor: Actor,
        now: Timestamp,
    ) -> Result<Option<AssetHealthReport>, LifecycleError> {
        self.transitioner.evaluate(asset_id, actor, now).await
    }

    pub async fn run_organization_health_check(
        &self,
        organization_id: DbId,
        actor: Actor,
        now: Timestamp,
    ) -> Result<BatchResult, LifecycleError> {
        self.evaluator
            .run_organization_health_check(organization_id, actor, now)
            .await
    }

    pub async fn run_all_organizations(
        &self,
        now: Timestamp,
    ) -> Result<AllOrganizationsResult, LifecycleError> {
        self.evaluator.run_all_organizations(now).await
    }

    /// Read-only gate for the issue-reporting collaborator. Nothing is written.
    pub async fn issue_reporting_allowed(
        &self,
        asset_id: DbId,
        now: Timestamp,
    ) -> Result<Option<IssueReportingDecision>, LifecycleError> {
        let Some(asset) = self.store.find_asset(asset_id).await? else {
            return Ok(None);
        };
        let (_, resolution) = self.transitioner.analyze(&asset, now).await?;
        Ok(Some(IssueReportingDecision {
            asset_id,
            can_report_issues: resolution.can_report_issues,
            recommended_condition: resolution.recommended_condition,
        }))
    }

    // --- Monitors ---

    pub async fn check_overdue_maintenance(
        &self,
        now: Timestamp,
    ) -> Result<MonitorSummary, LifecycleError> {
        self.overdue.check_overdue_maintenance(now).await
    }

    pub async fn check_expired_warranties(
        &self,
        now: Timestamp,
    ) -> Result<MonitorSummary, LifecycleError> {
        self.warranty.check_expired_warranties(now).await
    }

    pub async fn check_expiring_warranties(
        &self,
        now: Timestamp,
    ) -> Result<MonitorSummary, LifecycleError> {
        self.warranty.check_expiring_warranties(now).await
    }

    // --- Manual maintenance ---

    pub async fn start_maintenance(
        &self,
        asset_id: DbId,
        actor: Actor,
        reason: Option<String>,
        now: Timestamp,
    ) -> Result<Asset, LifecycleError> {
        self.maintenance
            .start_maintenance(asset_id, actor, reason, now)
            .await
    }

    pub async fn complete_maintenance(
        &self,
        asset_id: DbId,
        actor: Actor,
        condition: AssetCondition,
        status: &str,
        now: Timestamp,
    ) -> Result<Asset, LifecycleError> {
        self.maintenance
            .complete_maintenance(asset_id, actor, condition, status, now)
            .await
    }
}
