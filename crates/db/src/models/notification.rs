//! Notification insert DTO.

use assetwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// DTO for inserting one notification.
///
/// `created_at` is explicit so scheduled jobs driven by a controlled clock
/// stamp rows consistently with their dedup windows.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub organization_id: DbId,
    pub asset_id: Option<DbId>,
    pub notification_type: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub metadata: serde_json::Value,
    pub dedup_key: Option<String>,
    pub created_at: Timestamp,
}
