//! Single-asset evaluate-and-apply cycles against the in-memory store.

mod common;

use assert_matches::assert_matches;
use assetwatch_core::audit::{action_types, Actor};
use assetwatch_core::condition::{AssetCondition, MaintenanceReason, RiskLevel};
use assetwatch_core::error::CoreError;
use assetwatch_core::notification::TYPE_ASSET_MAINTENANCE;
use assetwatch_lifecycle::LifecycleError;
use common::*;

// ---------------------------------------------------------------------------
// Analysis without writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn healthy_asset_resolves_to_excellent_without_writing() {
    let store = seeded_store().await;
    store.insert_asset(asset(1, ORG)).await;

    let report = engine(&store)
        .check_asset(1, Actor::System, now())
        .await
        .unwrap()
        .expect("asset exists");

    assert_eq!(report.resolution.recommended_condition, AssetCondition::Excellent);
    assert!(!report.resolution.needs_update);
    assert!(!report.applied);

    let stored = store.asset(1).await.unwrap();
    assert_eq!(stored.condition, "good");
    assert_eq!(stored.last_health_check, None);
    assert!(store.notifications().await.is_empty());
    assert!(store.audit_logs().await.is_empty());
}

#[tokio::test]
async fn missing_asset_is_a_no_op() {
    let store = seeded_store().await;
    let result = engine(&store).check_asset(404, Actor::System, now()).await;
    assert_matches!(result, Ok(None));
}

#[tokio::test]
async fn maintenance_is_sticky_for_a_healthy_asset() {
    let store = seeded_store().await;
    store.insert_asset(asset_in_maintenance(1, days_ago(1))).await;

    let report = engine(&store)
        .check_asset(1, Actor::System, now())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        report.resolution.recommended_condition,
        AssetCondition::UnderMaintenance
    );
    assert_eq!(
        report.resolution.maintenance_reason,
        Some(MaintenanceReason::CurrentlyUnderMaintenance)
    );
    assert!(!report.applied);
    assert!(!report.resolution.can_report_issues);

    // Reason and start date from the original entry are kept.
    let stored = store.asset(1).await.unwrap();
    assert_eq!(stored.maintenance_reason.as_deref(), Some("age"));
    assert_eq!(stored.maintenance_start_date, Some(days_ago(1)));
}

#[tokio::test]
async fn unknown_stored_condition_is_a_validation_error() {
    let store = seeded_store().await;
    let mut broken = asset(1, ORG);
    broken.condition = "mangled".to_string();
    store.insert_asset(broken).await;

    let err = engine(&store)
        .check_asset(1, Actor::System, now())
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Transitions into maintenance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn old_asset_enters_maintenance_for_age() {
    let store = seeded_store().await;
    let mut old = asset(1, ORG);
    old.purchase_date = Some(days_ago(1900));
    old.assigned_to = Some(STAFF);
    store.insert_asset(old).await;

    let report = engine(&store)
        .check_asset(1, Actor::System, now())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.factors.age_years, 5.2);
    assert_eq!(report.resolution.maintenance_reason, Some(MaintenanceReason::Age));
    assert_eq!(report.resolution.risk_level, RiskLevel::Critical);
    assert!(report.applied);

    let stored = store.asset(1).await.unwrap();
    assert_eq!(stored.condition, "under_maintenance");
    assert_eq!(stored.status, "under_maintenance");
    assert_eq!(stored.maintenance_reason.as_deref(), Some("age"));
    assert_eq!(stored.maintenance_start_date, Some(now()));
    assert_eq!(stored.last_health_check, Some(now()));
    // Fields owned by other writers are untouched.
    assert_eq!(stored.name, "Asset 1");
    assert_eq!(stored.assigned_to, Some(STAFF));

    // Admin and manager tier plus the assignee; principals and inactive users excluded.
    assert_eq!(
        recipients_of(&store, 1, TYPE_ASSET_MAINTENANCE).await,
        vec![ADMIN, MANAGER, STAFF]
    );

    let audits = store.audit_logs().await;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].action, action_types::HEALTH_TRANSITION);
    assert_eq!(audits[0].severity, "high");
    assert_eq!(audits[0].actor, "system");
    assert_eq!(audits[0].actor_user_id, None);
    assert_eq!(audits[0].details["before"]["status"], "available");
    assert_eq!(audits[0].details["after"]["status"], "under_maintenance");
    assert_eq!(audits[0].details["factors"]["age_years"], 5.2);
}

#[tokio::test]
async fn issue_volume_sends_young_asset_to_maintenance() {
    let store = seeded_store().await;
    let mut young = asset(1, ORG);
    young.purchase_date = Some(days_ago(365));
    store.insert_asset(young).await;
    for _ in 0..9 {
        store.add_issue(1, "open").await;
    }
    // Resolved issues do not count.
    store.add_issue(1, "resolved").await;

    let report = engine(&store)
        .check_asset(1, Actor::System, now())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.factors.open_issues_count, 9);
    assert_eq!(
        report.resolution.maintenance_reason,
        Some(MaintenanceReason::Issues)
    );
    assert_eq!(
        store.asset(1).await.unwrap().maintenance_reason.as_deref(),
        Some("issues")
    );
}

#[tokio::test]
async fn assignee_who_is_also_a_manager_is_notified_once() {
    let store = seeded_store().await;
    let mut old = asset(1, ORG);
    old.purchase_date = Some(days_ago(2000));
    old.assigned_to = Some(MANAGER);
    store.insert_asset(old).await;

    engine(&store)
        .check_asset(1, Actor::System, now())
        .await
        .unwrap();

    assert_eq!(
        recipients_of(&store, 1, TYPE_ASSET_MAINTENANCE).await,
        vec![ADMIN, MANAGER]
    );
}

#[tokio::test]
async fn manual_check_records_the_acting_user() {
    let store = seeded_store().await;
    let mut old = asset(1, ORG);
    old.purchase_date = Some(days_ago(2000));
    store.insert_asset(old).await;

    engine(&store)
        .check_asset(1, Actor::User(ADMIN), now())
        .await
        .unwrap();

    let audits = store.audit_logs().await;
    assert_eq!(audits[0].actor_user_id, Some(ADMIN));
    assert_eq!(audits[0].actor, format!("user:{ADMIN}"));
}

#[tokio::test]
async fn critical_asset_is_not_rewritten() {
    let store = seeded_store().await;
    let mut aging = asset(1, ORG);
    aging.purchase_date = Some(days_ago(1461));
    store.insert_asset(aging).await;
    for _ in 0..6 {
        store.add_issue(1, "in_progress").await;
    }

    let report = engine(&store)
        .check_asset(1, Actor::System, now())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.resolution.recommended_condition, AssetCondition::Critical);
    assert_eq!(report.resolution.risk_level, RiskLevel::High);
    assert!(!report.applied);
    assert!(store.audit_logs().await.is_empty());
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_evaluation_is_a_no_op() {
    let store = seeded_store().await;
    let mut old = asset(1, ORG);
    old.purchase_date = Some(days_ago(1900));
    store.insert_asset(old).await;
    let engine = engine(&store);

    let first = engine.check_asset(1, Actor::System, now()).await.unwrap().unwrap();
    assert!(first.applied);
    let notifications_after_first = store.notifications().await.len();
    assert!(notifications_after_first > 0);

    let second = engine.check_asset(1, Actor::System, now()).await.unwrap().unwrap();
    assert!(!second.applied);
    assert!(!second.resolution.needs_update);
    assert_eq!(store.notifications().await.len(), notifications_after_first);
    assert_eq!(store.audit_logs().await.len(), 1);
}

// ---------------------------------------------------------------------------
// Best-effort side effects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notification_failure_does_not_roll_back_transition() {
    let store = seeded_store().await;
    let mut old = asset(1, ORG);
    old.purchase_date = Some(days_ago(1900));
    store.insert_asset(old).await;
    store.fail_notification_writes(true).await;

    let report = engine(&store)
        .check_asset(1, Actor::System, now())
        .await
        .expect("side-effect failure must not fail the check")
        .unwrap();

    assert!(report.applied);
    assert_eq!(store.asset(1).await.unwrap().status, "under_maintenance");
    assert!(store.notifications().await.is_empty());
    // The audit step still runs after a failed notification.
    assert_eq!(store.audit_logs().await.len(), 1);
}

#[tokio::test]
async fn audit_failure_does_not_roll_back_transition() {
    let store = seeded_store().await;
    let mut old = asset(1, ORG);
    old.purchase_date = Some(days_ago(1900));
    store.insert_asset(old).await;
    store.fail_audit_writes(true).await;

    let report = engine(&store)
        .check_asset(1, Actor::System, now())
        .await
        .unwrap()
        .unwrap();

    assert!(report.applied);
    assert_eq!(store.asset(1).await.unwrap().status, "under_maintenance");
    assert!(!store.notifications().await.is_empty());
    assert!(store.audit_logs().await.is_empty());
}
