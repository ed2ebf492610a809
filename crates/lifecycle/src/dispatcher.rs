//! Notification fan-out for lifecycle alerts.
//!
//! The dispatcher does not decide whether an alert is a duplicate on its own:
//! callers ask [`NotificationDispatcher::should_dispatch`] first and skip the
//! dispatch when it says no. Each row still carries a dedup key so that a
//! concurrent duplicate insert is dropped by the store.

use std::collections::BTreeSet;
use std::sync::Arc;

use assetwatch_core::notification::{dedup_key, DedupWindow, METADATA_ASSET_ID};
use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::notification::CreateNotification;
use chrono::FixedOffset;

use crate::error::StoreResult;
use crate::store::LifecycleStore;
use crate::templates::NotificationTemplate;

#[derive(Clone)]
pub struct NotificationDispatcher {
    store: Arc<dyn LifecycleStore>,
    offset: FixedOffset,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn LifecycleStore>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    /// Active users holding one of `roles` in the organization, plus the
    /// assigned user if any. Deduplicated by user id.
    pub async fn recipients(
        &self,
        organization_id: DbId,
        roles: &[&str],
        assigned_to: Option<DbId>,
    ) -> StoreResult<BTreeSet<DbId>> {
        let mut recipients: BTreeSet<DbId> = self
            .store
            .list_active_user_ids_by_roles(organization_id, roles)
            .await?
            .into_iter()
            .collect();
        recipients.extend(assigned_to);
        Ok(recipients)
    }

    /// Whether no alert of this type exists for the asset inside `window`.
    ///
    /// Fails closed: if the lookup errors, the alert is not sent this cycle.
    pub async fn should_dispatch(
        &self,
        asset_id: DbId,
        notification_type: &str,
        window: DedupWindow,
        now: Timestamp,
    ) -> bool {
        let since = window.since(now, self.offset);
        match self
            .store
            .notification_exists(asset_id, notification_type, since)
            .await
        {
            Ok(exists) => {
                if exists {
                    tracing::debug!(
                        asset_id,
                        notification_type,
                        "Alert already sent in dedup window, skipping"
                    );
                }
                !exists
            }
            Err(e) => {
                tracing::warn!(
                    asset_id,
                    notification_type,
                    error = %e,
                    "Dedup check failed, skipping alert this cycle"
                );
                false
            }
        }
    }

    /// Storage dedup key for an alert in `window` at `now`.
    pub fn dedup_key(
        &self,
        notification_type: &str,
        asset_id: DbId,
        window: DedupWindow,
        now: Timestamp,
    ) -> String {
        dedup_key(notification_type, asset_id, window, now, self.offset)
    }

    /// Create one notification per recipient.
    ///
    /// Returns how many rows were inserted; recipients whose row already
    /// existed under the same dedup key are not counted.
    pub async fn dispatch(
        &self,
        organization_id: DbId,
        asset_id: DbId,
        recipients: &BTreeSet<DbId>,
        template: &NotificationTemplate,
        now: Timestamp,
    ) -> StoreResult<usize> {
        let mut metadata = template.metadata.clone();
        if let Some(map) = metadata.as_object_mut() {
            map.insert(METADATA_ASSET_ID.to_string(), asset_id.into());
        }

        let mut created = 0;
        for &user_id in recipients {
            let input = CreateNotification {
                user_id,
                organization_id,
                asset_id: Some(asset_id),
                notification_type: template.notification_type.to_string(),
                title: template.title.clone(),
                body: template.body.clone(),
                link: template.link.clone(),
                metadata: metadata.clone(),
                dedup_key: template.dedup_key.clone(),
                created_at: now,
            };
            if self.store.create_notification(&input).await?.is_some() {
                created += 1;
            }
        }

        tracing::debug!(
            asset_id,
            notification_type = template.notification_type,
            recipients = recipients.len(),
            created,
            "Dispatched lifecycle notification"
        );
        Ok(created)
    }
}
