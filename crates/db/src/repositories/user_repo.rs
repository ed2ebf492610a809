//! Repository for the `users` table (read-only for the lifecycle engine).

use assetwatch_core::types::DbId;
use sqlx::PgPool;

/// Provides user lookups for notification fan-out.
pub struct UserRepo;

impl UserRepo {
    /// List the IDs of active users in an organization holding any of `roles`.
    pub async fn list_active_ids_by_roles(
        pool: &PgPool,
        organization_id: DbId,
        roles: &[&str],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        sqlx::query_scalar(
            "SELECT id FROM users \
             WHERE organization_id = $1 AND is_active = true AND role = ANY($2) \
             ORDER BY id",
        )
        .bind(organization_id)
        .bind(&roles)
        .fetch_all(pool)
        .await
    }
}
