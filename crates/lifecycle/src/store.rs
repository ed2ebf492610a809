//! Storage seam for the lifecycle engine.
//!
//! [`LifecycleStore`] gathers every read and write the engine performs
//! against the asset, issue, user, notification, and audit stores. The
//! production implementation is [`PgLifecycleStore`](crate::PgLifecycleStore);
//! [`MemoryStore`](crate::MemoryStore) backs tests and local runs.
//!
//! Timeout and retry policy belong to the implementation, not the engine.

use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::asset::{Asset, AssetHealthUpdate, CompleteMaintenance};
use assetwatch_db::models::audit::CreateAuditLog;
use assetwatch_db::models::notification::CreateNotification;
use async_trait::async_trait;

use crate::error::StoreResult;

#[async_trait]
pub trait LifecycleStore: Send + Sync {
    /// Verify the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    // --- Assets and issues (read) ---

    async fn list_organization_ids(&self) -> StoreResult<Vec<DbId>>;

    async fn list_asset_ids(&self, organization_id: DbId) -> StoreResult<Vec<DbId>>;

    async fn find_asset(&self, asset_id: DbId) -> StoreResult<Option<Asset>>;

    /// Count issues for the asset with status `open` or `in_progress`.
    async fn count_open_issues(&self, asset_id: DbId) -> StoreResult<i64>;

    /// Assets in maintenance whose start date is at or before `cutoff`.
    async fn list_assets_in_maintenance_since(&self, cutoff: Timestamp)
        -> StoreResult<Vec<Asset>>;

    /// Assets whose warranty expires in `[from, until)`.
    async fn list_assets_with_warranty_between(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> StoreResult<Vec<Asset>>;

    // --- Assets (partial writes of engine-owned fields) ---

    /// Returns `false` if the asset no longer exists, or if the update enters
    /// maintenance and the asset is already under maintenance.
    async fn apply_health_update(
        &self,
        asset_id: DbId,
        update: &AssetHealthUpdate,
    ) -> StoreResult<bool>;

    /// Returns `false` if the asset does not exist or is not in maintenance.
    async fn complete_maintenance(
        &self,
        asset_id: DbId,
        input: &CompleteMaintenance,
    ) -> StoreResult<bool>;

    // --- Users (read) ---

    async fn list_active_user_ids_by_roles(
        &self,
        organization_id: DbId,
        roles: &[&str],
    ) -> StoreResult<Vec<DbId>>;

    // --- Notifications ---

    /// Whether a notification of this type exists for the asset, created at or
    /// after `since` (at any time when `since` is `None`).
    async fn notification_exists(
        &self,
        asset_id: DbId,
        notification_type: &str,
        since: Option<Timestamp>,
    ) -> StoreResult<bool>;

    /// Insert one notification; `None` means the dedup key was already taken.
    async fn create_notification(&self, input: &CreateNotification)
        -> StoreResult<Option<DbId>>;

    // --- Audit ---

    async fn create_audit_log(&self, input: &CreateAuditLog) -> StoreResult<DbId>;
}
