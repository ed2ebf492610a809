//! Repository for the append-only `audit_logs` table.

use sqlx::PgPool;

use crate::models::audit::{AuditLog, CreateAuditLog};

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "\
    id, organization_id, actor, actor_user_id, action, resource_type, \
    resource_id, description, details, severity, created_at";

/// Provides insert and query operations for audit logs. There is no update
/// or delete; entries are immutable.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append an audit log entry, returning the stored row.
    pub async fn create(pool: &PgPool, input: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs \
                (organization_id, actor, actor_user_id, action, resource_type, \
                 resource_id, description, details, severity, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(input.organization_id)
            .bind(&input.actor)
            .bind(input.actor_user_id)
            .bind(&input.action)
            .bind(&input.resource_type)
            .bind(input.resource_id)
            .bind(&input.description)
            .bind(&input.details)
            .bind(&input.severity)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }
}
