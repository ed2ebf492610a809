//! Repository for the `notifications` table.

use assetwatch_core::notification::METADATA_ASSET_ID;
use assetwatch_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::notification::CreateNotification;

/// Provides insert and dedup lookups for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification unless its `(user_id, dedup_key)` already exists.
    ///
    /// Returns the new ID, or `None` when the unique index rejected the row
    /// as a duplicate.
    pub async fn create_if_absent(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications \
                (user_id, organization_id, asset_id, notification_type, title, body, \
                 link, metadata, dedup_key, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (user_id, dedup_key) WHERE dedup_key IS NOT NULL DO NOTHING \
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(input.organization_id)
        .bind(input.asset_id)
        .bind(&input.notification_type)
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.link)
        .bind(&input.metadata)
        .bind(&input.dedup_key)
        .bind(input.created_at)
        .fetch_optional(pool)
        .await
    }

    /// Whether a notification of `notification_type` exists for `asset_id`,
    /// created at or after `since` (any time when `since` is `None`).
    ///
    /// Matches on the denormalized `asset_id` column or the `asset_id`
    /// metadata key, so rows written by other producers are still seen.
    pub async fn exists_for_asset(
        pool: &PgPool,
        asset_id: DbId,
        notification_type: &str,
        since: Option<Timestamp>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS ( \
                SELECT 1 FROM notifications \
                WHERE notification_type = $2 \
                  AND (asset_id = $1 OR metadata ->> $3 = $1::TEXT) \
                  AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4) \
             )",
        )
        .bind(asset_id)
        .bind(notification_type)
        .bind(METADATA_ASSET_ID)
        .bind(since)
        .fetch_one(pool)
        .await
    }
}
