//! Expired and expiring warranty alerts.
//!
//! Date ranges are local calendar days in the configured offset:
//!
//! - expired: warranty ended yesterday, `[yesterday, today)`, alerted once ever;
//! - expiring: warranty ends today or within the horizon, alerted at most once
//!   per rolling re-alert window.

use std::sync::Arc;

use assetwatch_core::calendar::{calendar_days_between, local_date, local_midnight};
use assetwatch_core::notification::{DedupWindow, TYPE_WARRANTY_EXPIRING_SOON, TYPE_WARRANTY_EXPIRY};
use assetwatch_core::roles::WARRANTY_RECIPIENT_ROLES;
use assetwatch_core::types::Timestamp;
use chrono::{Days, FixedOffset};

use super::{alert_once, MonitorSummary};
use crate::dispatcher::NotificationDispatcher;
use crate::error::LifecycleError;
use crate::store::LifecycleStore;
use crate::templates;

#[derive(Clone)]
pub struct WarrantyMonitor {
    store: Arc<dyn LifecycleStore>,
    dispatcher: NotificationDispatcher,
    offset: FixedOffset,
    expiring_days: u64,
    realert_days: i64,
}

impl WarrantyMonitor {
    pub fn new(
        store: Arc<dyn LifecycleStore>,
        dispatcher: NotificationDispatcher,
        offset: FixedOffset,
        expiring_days: i64,
        realert_days: i64,
    ) -> Self {
        Self {
            store,
            dispatcher,
            offset,
            expiring_days: expiring_days.max(0).unsigned_abs(),
            realert_days,
        }
    }

    /// Alert on warranties that expired during the previous local day.
    pub async fn check_expired_warranties(
        &self,
        now: Timestamp,
    ) -> Result<MonitorSummary, LifecycleError> {
        let today = local_date(now, self.offset);
        let from = local_midnight(today - Days::new(1), self.offset);
        let until = local_midnight(today, self.offset);
        let assets = self
            .store
            .list_assets_with_warranty_between(from, until)
            .await?;

        let mut summary = MonitorSummary::default();
        for asset in &assets {
            let outcome = alert_once(
                &self.dispatcher,
                asset,
                TYPE_WARRANTY_EXPIRY,
                DedupWindow::Ever,
                WARRANTY_RECIPIENT_ROLES,
                now,
                |key| templates::warranty_expired(asset, key),
            )
            .await;
            summary = summary.record(outcome);
        }

        tracing::info!(
            checked = summary.checked,
            notified = summary.notified,
            skipped = summary.skipped,
            errors = summary.errors.len(),
            "Expired warranty check complete"
        );
        Ok(summary)
    }

    /// Alert on warranties ending between today and today plus the horizon,
    /// both days inclusive.
    pub async fn check_expiring_warranties(
        &self,
        now: Timestamp,
    ) -> Result<MonitorSummary, LifecycleError> {
        let today = local_date(now, self.offset);
        let from = local_midnight(today, self.offset);
        let until = local_midnight(today + Days::new(self.expiring_days + 1), self.offset);
        let assets = self
            .store
            .list_assets_with_warranty_between(from, until)
            .await?;

        let window = DedupWindow::Rolling {
            days: self.realert_days,
        };
        let mut summary = MonitorSummary::default();
        for asset in &assets {
            let days_remaining = asset
                .warranty_expiry
                .map(|expiry| calendar_days_between(now, expiry, self.offset))
                .unwrap_or_default();
            let outcome = alert_once(
                &self.dispatcher,
                asset,
                TYPE_WARRANTY_EXPIRING_SOON,
                window,
                WARRANTY_RECIPIENT_ROLES,
                now,
                |key| templates::warranty_expiring(asset, days_remaining, key),
            )
            .await;
            summary = summary.record(outcome);
        }

        tracing::info!(
            checked = summary.checked,
            notified = summary.notified,
            skipped = summary.skipped,
            errors = summary.errors.len(),
            "Expiring warranty check complete"
        );
        Ok(summary)
    }
}
