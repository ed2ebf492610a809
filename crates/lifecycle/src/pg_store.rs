//! PostgreSQL-backed [`LifecycleStore`] delegating to the repository layer.

use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::asset::{Asset, AssetHealthUpdate, CompleteMaintenance};
use assetwatch_db::models::audit::CreateAuditLog;
use assetwatch_db::models::notification::CreateNotification;
use assetwatch_db::repositories::{
    AssetRepo, AuditLogRepo, IssueRepo, NotificationRepo, OrganizationRepo, UserRepo,
};
use assetwatch_db::DbPool;
use async_trait::async_trait;

use crate::error::StoreResult;
use crate::store::LifecycleStore;

/// Production store over a shared connection pool.
#[derive(Clone)]
pub struct PgLifecycleStore {
    pool: DbPool,
}

impl PgLifecycleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LifecycleStore for PgLifecycleStore {
    async fn ping(&self) -> StoreResult<()> {
        assetwatch_db::health_check(&self.pool).await?;
        Ok(())
    }

    async fn list_organization_ids(&self) -> StoreResult<Vec<DbId>> {
        Ok(OrganizationRepo::list_ids(&self.pool).await?)
    }

    async fn list_asset_ids(&self, organization_id: DbId) -> StoreResult<Vec<DbId>> {
        Ok(AssetRepo::list_ids_for_organization(&self.pool, organization_id).await?)
    }

    async fn find_asset(&self, asset_id: DbId) -> StoreResult<Option<Asset>> {
        Ok(AssetRepo::find_by_id(&self.pool, asset_id).await?)
    }

    async fn count_open_issues(&self, asset_id: DbId) -> StoreResult<i64> {
        Ok(IssueRepo::count_open_for_asset(&self.pool, asset_id).await?)
    }

    async fn list_assets_in_maintenance_since(
        &self,
        cutoff: Timestamp,
    ) -> StoreResult<Vec<Asset>> {
        Ok(AssetRepo::list_in_maintenance_since(&self.pool, cutoff).await?)
    }

    async fn list_assets_with_warranty_between(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> StoreResult<Vec<Asset>> {
        Ok(AssetRepo::list_with_warranty_expiring_between(&self.pool, from, until).await?)
    }

    async fn apply_health_update(
        &self,
        asset_id: DbId,
        update: &AssetHealthUpdate,
    ) -> StoreResult<bool> {
        Ok(AssetRepo::apply_health_update(&self.pool, asset_id, update).await?)
    }

    async fn complete_maintenance(
        &self,
        asset_id: DbId,
        input: &CompleteMaintenance,
    ) -> StoreResult<bool> {
        Ok(AssetRepo::complete_maintenance(&self.pool, asset_id, input).await?)
    }

    async fn list_active_user_ids_by_roles(
        &self,
        organization_id: DbId,
        roles: &[&str],
    ) -> StoreResult<Vec<DbId>> {
        Ok(UserRepo::list_active_ids_by_roles(&self.pool, organization_id, roles).await?)
    }

    async fn notification_exists(
        &self,
        asset_id: DbId,
        notification_type: &str,
        since: Option<Timestamp>,
    ) -> StoreResult<bool> {
        Ok(
            NotificationRepo::exists_for_asset(&self.pool, asset_id, notification_type, since)
                .await?,
        )
    }

    async fn create_notification(
        &self,
        input: &CreateNotification,
    ) -> StoreResult<Option<DbId>> {
        match NotificationRepo::create_if_absent(&self.pool, input).await {
            Ok(id) => Ok(id),
            // A concurrent insert of the same dedup key: already sent.
            Err(e) if assetwatch_db::is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_audit_log(&self, input: &CreateAuditLog) -> StoreResult<DbId> {
        Ok(AuditLogRepo::create(&self.pool, input).await?.id)
    }
}
