//! In-process [`LifecycleStore`] for tests and local runs.
//!
//! Mirrors the PostgreSQL semantics the engine relies on: partial asset
//! updates, the `(user_id, dedup_key)` uniqueness rule for notifications, and
//! append-only audit rows. Failure switches let callers simulate a store that
//! errors for one asset or for a whole class of writes.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use assetwatch_core::condition::{is_under_maintenance, STATUS_UNDER_MAINTENANCE};
use assetwatch_core::notification::METADATA_ASSET_ID;
use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::asset::{Asset, AssetHealthUpdate, CompleteMaintenance};
use assetwatch_db::models::audit::{AuditLog, CreateAuditLog};
use assetwatch_db::models::notification::CreateNotification;
use assetwatch_db::repositories::issue_repo::OPEN_ISSUE_STATUSES;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::store::LifecycleStore;

/// A user as seen by the recipient queries.
#[derive(Debug, Clone)]
pub struct MemoryUser {
    pub id: DbId,
    pub organization_id: DbId,
    pub role: String,
    pub is_active: bool,
}

/// A stored notification together with its generated ID.
#[derive(Debug, Clone)]
pub struct StoredNotification {
    pub id: DbId,
    pub notification: CreateNotification,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: DbId,
    organizations: BTreeSet<DbId>,
    assets: BTreeMap<DbId, Asset>,
    issues: Vec<(DbId, String)>,
    users: Vec<MemoryUser>,
    notifications: Vec<StoredNotification>,
    audit_logs: Vec<AuditLog>,
    failing_asset_loads: HashSet<DbId>,
    fail_notification_writes: bool,
    fail_audit_writes: bool,
    fail_dedup_checks: bool,
    unavailable: bool,
}

impl MemoryState {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable {
            return Err(unavailable("store offline"));
        }
        Ok(())
    }
}

fn unavailable(what: &str) -> StoreError {
    StoreError::Unavailable(what.to_string())
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Seeding ---

    pub async fn insert_organization(&self, organization_id: DbId) {
        self.state.lock().await.organizations.insert(organization_id);
    }

    pub async fn insert_user(&self, user: MemoryUser) {
        let mut state = self.state.lock().await;
        state.organizations.insert(user.organization_id);
        state.users.push(user);
    }

    pub async fn insert_asset(&self, asset: Asset) {
        let mut state = self.state.lock().await;
        state.organizations.insert(asset.organization_id);
        state.assets.insert(asset.id, asset);
    }

    pub async fn add_issue(&self, asset_id: DbId, status: &str) {
        self.state
            .lock()
            .await
            .issues
            .push((asset_id, status.to_string()));
    }

    /// Pre-existing notification, e.g. written by a previous deployment.
    pub async fn insert_notification(&self, notification: CreateNotification) -> DbId {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        state
            .notifications
            .push(StoredNotification { id, notification });
        id
    }

    // --- Failure injection ---

    /// Make every `find_asset` call for `asset_id` fail.
    pub async fn fail_asset_loads(&self, asset_id: DbId) {
        self.state.lock().await.failing_asset_loads.insert(asset_id);
    }

    pub async fn fail_notification_writes(&self, fail: bool) {
        self.state.lock().await.fail_notification_writes = fail;
    }

    pub async fn fail_audit_writes(&self, fail: bool) {
        self.state.lock().await.fail_audit_writes = fail;
    }

    pub async fn fail_dedup_checks(&self, fail: bool) {
        self.state.lock().await.fail_dedup_checks = fail;
    }

    /// Make every call fail, as if the database were down.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    // --- Inspection ---

    pub async fn asset(&self, asset_id: DbId) -> Option<Asset> {
        self.state.lock().await.assets.get(&asset_id).cloned()
    }

    pub async fn notifications(&self) -> Vec<StoredNotification> {
        self.state.lock().await.notifications.clone()
    }

    /// Notifications of one type for one asset.
    pub async fn notifications_for(
        &self,
        asset_id: DbId,
        notification_type: &str,
    ) -> Vec<StoredNotification> {
        self.state
            .lock()
            .await
            .notifications
            .iter()
            .filter(|n| {
                n.notification.notification_type == notification_type
                    && references_asset(&n.notification, asset_id)
            })
            .cloned()
            .collect()
    }

    pub async fn audit_logs(&self) -> Vec<AuditLog> {
        self.state.lock().await.audit_logs.clone()
    }
}

fn references_asset(notification: &CreateNotification, asset_id: DbId) -> bool {
    notification.asset_id == Some(asset_id)
        || notification
            .metadata
            .get(METADATA_ASSET_ID)
            .and_then(serde_json::Value::as_i64)
            == Some(asset_id)
}

#[async_trait]
impl LifecycleStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.state.lock().await.check_available()
    }

    async fn list_organization_ids(&self) -> StoreResult<Vec<DbId>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.organizations.iter().copied().collect())
    }

    async fn list_asset_ids(&self, organization_id: DbId) -> StoreResult<Vec<DbId>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .assets
            .values()
            .filter(|a| a.organization_id == organization_id)
            .map(|a| a.id)
            .collect())
    }

    async fn find_asset(&self, asset_id: DbId) -> StoreResult<Option<Asset>> {
        let state = self.state.lock().await;
        state.check_available()?;
        if state.failing_asset_loads.contains(&asset_id) {
            return Err(unavailable(&format!("failed to load asset {asset_id}")));
        }
        Ok(state.assets.get(&asset_id).cloned())
    }

    async fn count_open_issues(&self, asset_id: DbId) -> StoreResult<i64> {
        let state = self.state.lock().await;
        state.check_available()?;
        let count = state
            .issues
            .iter()
            .filter(|(id, status)| *id == asset_id && OPEN_ISSUE_STATUSES.contains(&status.as_str()))
            .count();
        Ok(count as i64)
    }

    async fn list_assets_in_maintenance_since(
        &self,
        cutoff: Timestamp,
    ) -> StoreResult<Vec<Asset>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .assets
            .values()
            .filter(|a| {
                is_under_maintenance(&a.status)
                    && a.maintenance_start_date.is_some_and(|start| start <= cutoff)
            })
            .cloned()
            .collect())
    }

    async fn list_assets_with_warranty_between(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> StoreResult<Vec<Asset>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .assets
            .values()
            .filter(|a| {
                a.warranty_expiry
                    .is_some_and(|expiry| expiry >= from && expiry < until)
            })
            .cloned()
            .collect())
    }

    async fn apply_health_update(
        &self,
        asset_id: DbId,
        update: &AssetHealthUpdate,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        let Some(asset) = state.assets.get_mut(&asset_id) else {
            return Ok(false);
        };
        if update.maintenance.is_some() && is_under_maintenance(&asset.status) {
            return Ok(false);
        }
        asset.condition = update.condition.clone();
        asset.status = update.status.clone();
        if let Some(checked) = update.last_health_check {
            asset.last_health_check = Some(checked);
        }
        if let Some(entry) = &update.maintenance {
            asset.maintenance_reason = Some(entry.reason.clone());
            asset.maintenance_start_date = Some(entry.started_at);
        }
        Ok(true)
    }

    async fn complete_maintenance(
        &self,
        asset_id: DbId,
        input: &CompleteMaintenance,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        let Some(asset) = state.assets.get_mut(&asset_id) else {
            return Ok(false);
        };
        if asset.status != STATUS_UNDER_MAINTENANCE {
            return Ok(false);
        }
        asset.condition = input.condition.clone();
        asset.status = input.status.clone();
        asset.maintenance_reason = None;
        asset.maintenance_start_date = None;
        asset.maintenance_completed_date = Some(input.completed_at);
        Ok(true)
    }

    async fn list_active_user_ids_by_roles(
        &self,
        organization_id: DbId,
        roles: &[&str],
    ) -> StoreResult<Vec<DbId>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .users
            .iter()
            .filter(|u| {
                u.organization_id == organization_id
                    && u.is_active
                    && roles.contains(&u.role.as_str())
            })
            .map(|u| u.id)
            .collect())
    }

    async fn notification_exists(
        &self,
        asset_id: DbId,
        notification_type: &str,
        since: Option<Timestamp>,
    ) -> StoreResult<bool> {
        let state = self.state.lock().await;
        state.check_available()?;
        if state.fail_dedup_checks {
            return Err(unavailable("dedup lookup failed"));
        }
        Ok(state.notifications.iter().any(|n| {
            n.notification.notification_type == notification_type
                && references_asset(&n.notification, asset_id)
                && since.map_or(true, |since| n.notification.created_at >= since)
        }))
    }

    async fn create_notification(
        &self,
        input: &CreateNotification,
    ) -> StoreResult<Option<DbId>> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        if state.fail_notification_writes {
            return Err(unavailable("notification insert failed"));
        }
        if let Some(key) = &input.dedup_key {
            let taken = state.notifications.iter().any(|n| {
                n.notification.user_id == input.user_id
                    && n.notification.dedup_key.as_ref() == Some(key)
            });
            if taken {
                return Ok(None);
            }
        }
        let id = state.allocate_id();
        state.notifications.push(StoredNotification {
            id,
            notification: input.clone(),
        });
        Ok(Some(id))
    }

    async fn create_audit_log(&self, input: &CreateAuditLog) -> StoreResult<DbId> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        if state.fail_audit_writes {
            return Err(unavailable("audit insert failed"));
        }
        let id = state.allocate_id();
        state.audit_logs.push(AuditLog {
            id,
            organization_id: input.organization_id,
            actor: input.actor.clone(),
            actor_user_id: input.actor_user_id,
            action: input.action.clone(),
            resource_type: input.resource_type.clone(),
            resource_id: input.resource_id,
            description: input.description.clone(),
            details: input.details.clone(),
            severity: input.severity.clone(),
            created_at: input.created_at,
        });
        Ok(id)
    }
}
