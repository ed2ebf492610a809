//! Per-organization batch health checks.
//!
//! A batch is a sequential fold over the organization's asset ids into a
//! [`BatchResult`]. Per-asset failures are recorded and the fold moves on; a
//! batch never stops early.

use std::sync::Arc;

use assetwatch_core::audit::Actor;
use assetwatch_core::condition::AssetCondition;
use assetwatch_core::types::{DbId, Timestamp};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::{AssetError, LifecycleError};
use crate::store::LifecycleStore;
use crate::transitioner::{AssetHealthReport, LifecycleTransitioner};

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub organization_id: DbId,
    /// Every asset id visited, including failed and vanished ones.
    pub total: usize,
    /// Transitions actually persisted.
    pub updated: usize,
    /// Assets resolved to `under_maintenance`.
    pub maintenance: usize,
    /// Assets resolved to `critical`.
    pub critical: usize,
    pub errors: Vec<AssetError>,
}

impl BatchResult {
    pub fn new(organization_id: DbId) -> Self {
        Self {
            organization_id,
            ..Self::default()
        }
    }

    /// Fold one asset's outcome into the running result.
    pub fn record(
        mut self,
        asset_id: DbId,
        outcome: Result<Option<AssetHealthReport>, LifecycleError>,
    ) -> Self {
        self.total += 1;
        match outcome {
            Ok(Some(report)) => {
                if report.applied {
                    self.updated += 1;
                }
                match report.resolution.recommended_condition {
                    AssetCondition::UnderMaintenance => self.maintenance += 1,
                    AssetCondition::Critical => self.critical += 1,
                    _ => {}
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(asset_id, error = %e, "Health check failed for asset");
                self.errors.push(AssetError::new(asset_id, &e));
            }
        }
        self
    }
}

/// An organization whose batch could not start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationError {
    pub organization_id: DbId,
    pub error: String,
}

/// Outcome of evaluating every organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllOrganizationsResult {
    pub organizations: Vec<BatchResult>,
    pub failed: Vec<OrganizationError>,
}

impl AllOrganizationsResult {
    pub fn total_assets(&self) -> usize {
        self.organizations.iter().map(|b| b.total).sum()
    }

    pub fn total_updated(&self) -> usize {
        self.organizations.iter().map(|b| b.updated).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.organizations.iter().map(|b| b.errors.len()).sum()
    }
}

#[derive(Clone)]
pub struct ScheduledEvaluator {
    store: Arc<dyn LifecycleStore>,
    transitioner: LifecycleTransitioner,
}

impl ScheduledEvaluator {
    pub fn new(store: Arc<dyn LifecycleStore>, transitioner: LifecycleTransitioner) -> Self {
        Self {
            store,
            transitioner,
        }
    }

    /// Evaluate every asset of one organization, one at a time.
    ///
    /// Only a failure to list the organization's assets fails the call.
    pub async fn run_organization_health_check(
        &self,
        organization_id: DbId,
        actor: Actor,
        now: Timestamp,
    ) -> Result<BatchResult, LifecycleError> {
        let asset_ids = self.store.list_asset_ids(organization_id).await?;
        let transitioner = &self.transitioner;

        let result = stream::iter(asset_ids)
            .fold(BatchResult::new(organization_id), |acc, asset_id| async move {
                let outcome = transitioner.evaluate(asset_id, actor, now).await;
                acc.record(asset_id, outcome)
            })
            .await;

        tracing::info!(
            organization_id,
            total = result.total,
            updated = result.updated,
            maintenance = result.maintenance,
            critical = result.critical,
            errors = result.errors.len(),
            "Organization health check complete"
        );
        Ok(result)
    }

    /// Run the batch for every organization as the system actor.
    pub async fn run_all_organizations(
        &self,
        now: Timestamp,
    ) -> Result<AllOrganizationsResult, LifecycleError> {
        let organization_ids = self.store.list_organization_ids().await?;

        let mut result = AllOrganizationsResult::default();
        for organization_id in organization_ids {
            match self
                .run_organization_health_check(organization_id, Actor::System, now)
                .await
            {
                Ok(batch) => result.organizations.push(batch),
                Err(e) => {
                    tracing::error!(organization_id, error = %e, "Organization health check failed");
                    result.failed.push(OrganizationError {
                        organization_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            organizations = result.organizations.len(),
            failed = result.failed.len(),
            assets = result.total_assets(),
            updated = result.total_updated(),
            errors = result.total_errors(),
            "Scheduled health check complete"
        );
        Ok(result)
    }
}
