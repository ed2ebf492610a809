//! Repository for the `assets` table.
//!
//! Writes are partial updates of the lifecycle-owned columns only, so they
//! never clobber concurrent edits made through the CRUD layer.

use assetwatch_core::condition::STATUS_UNDER_MAINTENANCE;
use assetwatch_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::asset::{Asset, AssetHealthUpdate, CompleteMaintenance};

/// Column list for `assets` queries.
const COLUMNS: &str = "\
    id, organization_id, asset_code, name, condition, status, \
    maintenance_reason, maintenance_start_date, maintenance_completed_date, \
    last_health_check, purchase_date, warranty_expiry, assigned_to, \
    created_at, updated_at";

/// Provides read and lifecycle-update operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Find an asset by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the IDs of every asset in an organization.
    pub async fn list_ids_for_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM assets WHERE organization_id = $1 ORDER BY id")
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// List assets, across all organizations, that have been in maintenance
    /// since `cutoff` or earlier.
    pub async fn list_in_maintenance_since(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets \
             WHERE status = $1 AND maintenance_start_date <= $2 \
             ORDER BY maintenance_start_date ASC"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(STATUS_UNDER_MAINTENANCE)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// List assets whose warranty expires in the half-open range `[from, until)`.
    pub async fn list_with_warranty_expiring_between(
        pool: &PgPool,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets \
             WHERE warranty_expiry >= $1 AND warranty_expiry < $2 \
             ORDER BY warranty_expiry ASC"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(from)
            .bind(until)
            .fetch_all(pool)
            .await
    }

    /// Apply a health transition.
    ///
    /// An update that enters maintenance only matches a row not already under
    /// maintenance, so the first of two concurrent entries wins. Returns `true`
    /// if a row was updated.
    pub async fn apply_health_update(
        pool: &PgPool,
        id: DbId,
        update: &AssetHealthUpdate,
    ) -> Result<bool, sqlx::Error> {
        let entering = update.maintenance.is_some();
        let reason = update.maintenance.as_ref().map(|m| m.reason.as_str());
        let started_at = update.maintenance.as_ref().map(|m| m.started_at);

        let result = sqlx::query(
            "UPDATE assets SET \
                condition = $2, \
                status = $3, \
                last_health_check = COALESCE($4, last_health_check), \
                maintenance_reason = CASE WHEN $5 THEN $6 ELSE maintenance_reason END, \
                maintenance_start_date = CASE WHEN $5 THEN $7 ELSE maintenance_start_date END, \
                updated_at = NOW() \
             WHERE id = $1 AND (NOT $5 OR status <> $8)",
        )
        .bind(id)
        .bind(&update.condition)
        .bind(&update.status)
        .bind(update.last_health_check)
        .bind(entering)
        .bind(reason)
        .bind(started_at)
        .bind(STATUS_UNDER_MAINTENANCE)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Complete maintenance for an asset currently under maintenance.
    ///
    /// Returns `true` if the asset was in maintenance and has been updated.
    pub async fn complete_maintenance(
        pool: &PgPool,
        id: DbId,
        input: &CompleteMaintenance,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE assets SET \
                condition = $2, \
                status = $3, \
                maintenance_reason = NULL, \
                maintenance_start_date = NULL, \
                maintenance_completed_date = $4, \
                updated_at = NOW() \
             WHERE id = $1 AND status = $5",
        )
        .bind(id)
        .bind(&input.condition)
        .bind(&input.status)
        .bind(input.completed_at)
        .bind(STATUS_UNDER_MAINTENANCE)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
