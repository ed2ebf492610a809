//! Periodic alert jobs over assets of every organization.
//!
//! Each monitor selects candidate assets, checks the dedup window per asset,
//! and dispatches one alert per asset to the relevant role tier plus the
//! assignee. Per-asset failures are collected into a [`MonitorSummary`].

pub mod overdue;
pub mod warranty;

pub use overdue::OverdueMaintenanceMonitor;
pub use warranty::WarrantyMonitor;

use assetwatch_core::notification::DedupWindow;
use assetwatch_core::types::Timestamp;
use assetwatch_db::models::asset::Asset;
use serde::Serialize;

use crate::dispatcher::NotificationDispatcher;
use crate::error::AssetError;
use crate::templates::NotificationTemplate;
use crate::transitioner::notify_all;

/// Outcome of one monitor run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorSummary {
    /// Candidate assets found.
    pub checked: usize,
    /// Assets for which at least one notification was created.
    pub notified: usize,
    /// Assets skipped by the dedup window or with nothing to send.
    pub skipped: usize,
    pub errors: Vec<AssetError>,
}

/// What happened to one candidate asset.
#[derive(Debug)]
pub(crate) enum AlertOutcome {
    Sent,
    Skipped,
    Failed(AssetError),
}

impl MonitorSummary {
    pub(crate) fn record(mut self, outcome: AlertOutcome) -> Self {
        self.checked += 1;
        match outcome {
            AlertOutcome::Sent => self.notified += 1,
            AlertOutcome::Skipped => self.skipped += 1,
            AlertOutcome::Failed(e) => self.errors.push(e),
        }
        self
    }
}

/// Dedup-check and dispatch one alert for `asset`.
///
/// `build` renders the template from the storage dedup key and is only
/// called when the window is clear.
pub(crate) async fn alert_once(
    dispatcher: &NotificationDispatcher,
    asset: &Asset,
    notification_type: &str,
    window: DedupWindow,
    roles: &[&str],
    now: Timestamp,
    build: impl FnOnce(String) -> NotificationTemplate,
) -> AlertOutcome {
    if !dispatcher
        .should_dispatch(asset.id, notification_type, window, now)
        .await
    {
        return AlertOutcome::Skipped;
    }

    let template = build(dispatcher.dedup_key(notification_type, asset.id, window, now));
    match notify_all(dispatcher, asset, roles, &template, now).await {
        Ok(0) => AlertOutcome::Skipped,
        Ok(_) => AlertOutcome::Sent,
        Err(e) => {
            tracing::error!(
                asset_id = asset.id,
                notification_type,
                error = %e,
                "Failed to dispatch alert"
            );
            AlertOutcome::Failed(AssetError::new(asset.id, &e))
        }
    }
}
