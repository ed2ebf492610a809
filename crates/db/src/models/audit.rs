//! Audit log entity model and insert DTO.
//!
//! Audit logs have no `updated_at` field (immutable records).

use assetwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub organization_id: DbId,
    pub actor: String,
    pub actor_user_id: Option<DbId>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: DbId,
    pub description: String,
    pub details: serde_json::Value,
    pub severity: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateAuditLog {
    pub organization_id: DbId,
    pub actor: String,
    pub actor_user_id: Option<DbId>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: DbId,
    pub description: String,
    pub details: serde_json::Value,
    pub severity: String,
    pub created_at: Timestamp,
}
