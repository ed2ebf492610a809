//! Escalation for assets that have stayed in maintenance too long.

use std::sync::Arc;

use assetwatch_core::notification::{DedupWindow, TYPE_MAINTENANCE_OVERDUE};
use assetwatch_core::roles::MAINTENANCE_RECIPIENT_ROLES;
use assetwatch_core::types::Timestamp;
use chrono::Duration;

use super::{alert_once, MonitorSummary};
use crate::dispatcher::NotificationDispatcher;
use crate::error::LifecycleError;
use crate::store::LifecycleStore;
use crate::templates;

#[derive(Clone)]
pub struct OverdueMaintenanceMonitor {
    store: Arc<dyn LifecycleStore>,
    dispatcher: NotificationDispatcher,
    grace_days: i64,
}

impl OverdueMaintenanceMonitor {
    pub fn new(
        store: Arc<dyn LifecycleStore>,
        dispatcher: NotificationDispatcher,
        grace_days: i64,
    ) -> Self {
        Self {
            store,
            dispatcher,
            grace_days,
        }
    }

    /// Alert on every asset in maintenance since at least `grace_days` ago.
    ///
    /// At most one escalation per asset per local calendar day.
    pub async fn check_overdue_maintenance(
        &self,
        now: Timestamp,
    ) -> Result<MonitorSummary, LifecycleError> {
        let cutoff = now - Duration::days(self.grace_days);
        let assets = self.store.list_assets_in_maintenance_since(cutoff).await?;

        let mut summary = MonitorSummary::default();
        for asset in &assets {
            let days = asset
                .maintenance_start_date
                .map(|start| (now - start).num_days())
                .unwrap_or_default();
            let outcome = alert_once(
                &self.dispatcher,
                asset,
                TYPE_MAINTENANCE_OVERDUE,
                DedupWindow::Today,
                MAINTENANCE_RECIPIENT_ROLES,
                now,
                |key| templates::maintenance_overdue(asset, days, key),
            )
            .await;
            summary = summary.record(outcome);
        }

        tracing::info!(
            checked = summary.checked,
            notified = summary.notified,
            skipped = summary.skipped,
            errors = summary.errors.len(),
            "Overdue maintenance check complete"
        );
        Ok(summary)
    }
}
