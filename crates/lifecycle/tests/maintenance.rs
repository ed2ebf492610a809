//! Manual maintenance actions and the issue-reporting gate.

mod common;

use assert_matches::assert_matches;
use assetwatch_core::audit::{action_types, Actor};
use assetwatch_core::condition::{AssetCondition, STATUS_AVAILABLE, STATUS_IN_USE};
use assetwatch_core::error::CoreError;
use assetwatch_core::notification::TYPE_ASSET_MAINTENANCE;
use assetwatch_db::models::asset::{AssetHealthUpdate, MaintenanceEntry};
use assetwatch_lifecycle::{LifecycleError, LifecycleStore};
use chrono::Duration;
use common::*;

#[tokio::test]
async fn operator_can_start_maintenance() {
    let store = seeded_store().await;
    store.insert_asset(asset(1, ORG)).await;

    let updated = engine(&store)
        .start_maintenance(1, Actor::User(MANAGER), Some("screen replacement".into()), now())
        .await
        .unwrap();

    assert_eq!(updated.status, "under_maintenance");
    assert_eq!(updated.condition, "under_maintenance");
    assert_eq!(updated.maintenance_reason.as_deref(), Some("screen replacement"));
    assert_eq!(updated.maintenance_start_date, Some(now()));
    assert_eq!(updated.last_health_check, None);

    assert_eq!(
        recipients_of(&store, 1, TYPE_ASSET_MAINTENANCE).await,
        vec![ADMIN, MANAGER]
    );
    let audits = store.audit_logs().await;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].action, action_types::MAINTENANCE_STARTED);
    assert_eq!(audits[0].actor_user_id, Some(MANAGER));
}

#[tokio::test]
async fn blank_reason_falls_back_to_manual() {
    let store = seeded_store().await;
    store.insert_asset(asset(1, ORG)).await;

    let updated = engine(&store)
        .start_maintenance(1, Actor::User(ADMIN), Some("   ".into()), now())
        .await
        .unwrap();
    assert_eq!(updated.maintenance_reason.as_deref(), Some("manual"));
}

#[tokio::test]
async fn starting_twice_is_a_conflict() {
    let store = seeded_store().await;
    store.insert_asset(asset_in_maintenance(1, days_ago(1))).await;

    let err = engine(&store)
        .start_maintenance(1, Actor::User(ADMIN), None, now())
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Conflict(_)));
}

#[tokio::test]
async fn entering_maintenance_does_not_overwrite_an_open_entry() {
    let store = seeded_store().await;
    let started = days_ago(4);
    store.insert_asset(asset_in_maintenance(1, started)).await;

    let update = AssetHealthUpdate {
        condition: "under_maintenance".into(),
        status: "under_maintenance".into(),
        last_health_check: None,
        maintenance: Some(MaintenanceEntry {
            reason: "manual".into(),
            started_at: now(),
        }),
    };
    let applied = store.apply_health_update(1, &update).await.unwrap();
    assert!(!applied);

    let stored = store.asset(1).await.unwrap();
    assert_eq!(stored.maintenance_start_date, Some(started));
    assert_eq!(stored.maintenance_reason.as_deref(), Some("age"));
}

#[tokio::test]
async fn missing_asset_is_not_found() {
    let store = seeded_store().await;
    let err = engine(&store)
        .start_maintenance(99, Actor::User(ADMIN), None, now())
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::NotFound { id: 99, .. }));
}

#[tokio::test]
async fn completing_maintenance_clears_it() {
    let store = seeded_store().await;
    store.insert_asset(asset_in_maintenance(1, days_ago(4))).await;

    let updated = engine(&store)
        .complete_maintenance(1, Actor::User(ADMIN), AssetCondition::Good, STATUS_IN_USE, now())
        .await
        .unwrap();

    assert_eq!(updated.condition, "good");
    assert_eq!(updated.status, STATUS_IN_USE);
    assert_eq!(updated.maintenance_reason, None);
    assert_eq!(updated.maintenance_start_date, None);
    assert_eq!(updated.maintenance_completed_date, Some(now()));

    let audits = store.audit_logs().await;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].action, action_types::MAINTENANCE_COMPLETED);
    assert_eq!(audits[0].details["days_in_maintenance"], 4);
}

#[tokio::test]
async fn health_check_after_completion_does_not_reenter_maintenance() {
    let store = seeded_store().await;
    store.insert_asset(asset_in_maintenance(1, days_ago(4))).await;
    let engine = engine(&store);

    engine
        .complete_maintenance(1, Actor::User(ADMIN), AssetCondition::Good, STATUS_AVAILABLE, now())
        .await
        .unwrap();
    let report = engine
        .check_asset(1, Actor::System, now() + Duration::hours(1))
        .await
        .unwrap()
        .unwrap();

    assert!(!report.applied);
    assert_eq!(store.asset(1).await.unwrap().status, STATUS_AVAILABLE);
}

#[tokio::test]
async fn completing_an_asset_not_in_maintenance_is_a_conflict() {
    let store = seeded_store().await;
    store.insert_asset(asset(1, ORG)).await;

    let err = engine(&store)
        .complete_maintenance(1, Actor::User(ADMIN), AssetCondition::Good, STATUS_AVAILABLE, now())
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Conflict(_)));
}

#[tokio::test]
async fn completion_must_leave_maintenance() {
    let store = seeded_store().await;
    store.insert_asset(asset_in_maintenance(1, days_ago(4))).await;
    let engine = engine(&store);

    let err = engine
        .complete_maintenance(
            1,
            Actor::User(ADMIN),
            AssetCondition::UnderMaintenance,
            STATUS_AVAILABLE,
            now(),
        )
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));

    let err = engine
        .complete_maintenance(1, Actor::User(ADMIN), AssetCondition::Good, "on_fire", now())
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));

    assert_eq!(store.asset(1).await.unwrap().status, "under_maintenance");
}

// ---------------------------------------------------------------------------
// Issue-reporting gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn issue_reporting_is_blocked_during_maintenance() {
    let store = seeded_store().await;
    store.insert_asset(asset(1, ORG)).await;
    store.insert_asset(asset_in_maintenance(2, days_ago(1))).await;
    let engine = engine(&store);

    let open = engine.issue_reporting_allowed(1, now()).await.unwrap().unwrap();
    assert!(open.can_report_issues);

    let blocked = engine.issue_reporting_allowed(2, now()).await.unwrap().unwrap();
    assert!(!blocked.can_report_issues);
    assert_eq!(blocked.recommended_condition, AssetCondition::UnderMaintenance);

    assert!(engine.issue_reporting_allowed(3, now()).await.unwrap().is_none());
    // The gate never writes.
    assert!(store.audit_logs().await.is_empty());
}
