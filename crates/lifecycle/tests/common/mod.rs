#![allow(dead_code)]

use std::sync::Arc;

use assetwatch_core::condition::STATUS_AVAILABLE;
use assetwatch_core::roles::{ROLE_ADMIN, ROLE_MANAGER, ROLE_PRINCIPAL, ROLE_STAFF};
use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::asset::Asset;
use assetwatch_lifecycle::{LifecycleConfig, LifecycleEngine, MemoryStore, MemoryUser};
use chrono::{Duration, TimeZone, Utc};

pub const ORG: DbId = 1;
pub const ADMIN: DbId = 100;
pub const MANAGER: DbId = 101;
pub const PRINCIPAL: DbId = 102;
pub const STAFF: DbId = 103;
pub const INACTIVE_ADMIN: DbId = 104;

/// Monday 2024-06-10 09:00 UTC.
pub fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> Timestamp {
    now() - Duration::days(days)
}

/// A healthy, never-checked asset in `good`/`available`.
pub fn asset(id: DbId, organization_id: DbId) -> Asset {
    let created = days_ago(30);
    Asset {
        id,
        organization_id,
        asset_code: format!("AST-{id:03}"),
        name: format!("Asset {id}"),
        condition: "good".to_string(),
        status: STATUS_AVAILABLE.to_string(),
        maintenance_reason: None,
        maintenance_start_date: None,
        maintenance_completed_date: None,
        last_health_check: None,
        purchase_date: None,
        warranty_expiry: None,
        assigned_to: None,
        created_at: created,
        updated_at: created,
    }
}

/// An asset already in maintenance since `started_at`.
pub fn asset_in_maintenance(id: DbId, started_at: Timestamp) -> Asset {
    Asset {
        condition: "under_maintenance".to_string(),
        status: "under_maintenance".to_string(),
        maintenance_reason: Some("age".to_string()),
        maintenance_start_date: Some(started_at),
        ..asset(id, ORG)
    }
}

/// Store seeded with one user per role tier in [`ORG`], plus an inactive admin.
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (id, role, is_active) in [
        (ADMIN, ROLE_ADMIN, true),
        (MANAGER, ROLE_MANAGER, true),
        (PRINCIPAL, ROLE_PRINCIPAL, true),
        (STAFF, ROLE_STAFF, true),
        (INACTIVE_ADMIN, ROLE_ADMIN, false),
    ] {
        store
            .insert_user(MemoryUser {
                id,
                organization_id: ORG,
                role: role.to_string(),
                is_active,
            })
            .await;
    }
    store
}

pub fn engine(store: &Arc<MemoryStore>) -> LifecycleEngine {
    engine_with(store, LifecycleConfig::default())
}

pub fn engine_with(store: &Arc<MemoryStore>, config: LifecycleConfig) -> LifecycleEngine {
    LifecycleEngine::new(store.clone(), config)
}

/// Recipient ids of every notification of `notification_type` for the asset.
pub async fn recipients_of(
    store: &MemoryStore,
    asset_id: DbId,
    notification_type: &str,
) -> Vec<DbId> {
    let mut ids: Vec<DbId> = store
        .notifications_for(asset_id, notification_type)
        .await
        .into_iter()
        .map(|n| n.notification.user_id)
        .collect();
    ids.sort_unstable();
    ids
}
