//! Repository for the `organizations` table.

use assetwatch_core::types::DbId;
use sqlx::PgPool;

/// Provides organization lookups for scheduled batch runs.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// List every organization ID.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM organizations ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
