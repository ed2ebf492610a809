//! Asset entity model and lifecycle update DTOs.

use assetwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `assets` table.
///
/// `condition`, `status`, `maintenance_reason`, `maintenance_start_date` and
/// `last_health_check` are written by the lifecycle engine; the remaining
/// fields belong to the CRUD layer and are read-only here.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub organization_id: DbId,
    pub asset_code: String,
    pub name: String,
    pub condition: String,
    pub status: String,
    pub maintenance_reason: Option<String>,
    pub maintenance_start_date: Option<Timestamp>,
    pub maintenance_completed_date: Option<Timestamp>,
    pub last_health_check: Option<Timestamp>,
    pub purchase_date: Option<Timestamp>,
    pub warranty_expiry: Option<Timestamp>,
    pub assigned_to: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Maintenance fields written when an asset enters maintenance.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceEntry {
    pub reason: String,
    pub started_at: Timestamp,
}

/// Partial update applied by a health transition.
///
/// Only the engine-owned columns are touched. `maintenance` is `Some` only
/// when the transition enters maintenance; otherwise the existing reason and
/// start date are preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetHealthUpdate {
    pub condition: String,
    pub status: String,
    /// `None` keeps the stored value (manual actions are not health checks).
    pub last_health_check: Option<Timestamp>,
    pub maintenance: Option<MaintenanceEntry>,
}

/// Partial update applied when an operator completes maintenance.
///
/// Clears the reason and start date and stamps the completion date.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteMaintenance {
    pub condition: String,
    pub status: String,
    pub completed_at: Timestamp,
}
