//! Integration tests for organization-wide health checks.

mod common;

use axum::http::StatusCode;
use common::{asset, body_json, days_ago, post};

#[tokio::test]
async fn organization_health_check_counts_transitions() {
    let store = common::seeded_store().await;
    store.insert_asset(asset(1)).await;
    let mut old = asset(2);
    old.purchase_date = Some(days_ago(1900));
    store.insert_asset(old).await;
    let mut aging = asset(3);
    aging.purchase_date = Some(days_ago(1200));
    store.insert_asset(aging).await;
    let app = common::build_test_app(store.clone());

    let response = post(app, "/api/v1/organizations/1/health-check").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["organization_id"], 1);
    assert_eq!(data["total"], 3);
    assert_eq!(data["updated"], 1);
    assert_eq!(data["maintenance"], 1);
    assert_eq!(data["critical"], 1);
    assert_eq!(data["errors"].as_array().unwrap().len(), 0);

    // Critical keeps the asset available, so nothing is written for it.
    assert_eq!(store.asset(2).await.unwrap().status, "under_maintenance");
    assert_eq!(store.asset(3).await.unwrap().status, "available");
}

#[tokio::test]
async fn per_asset_failures_do_not_fail_the_request() {
    let store = common::seeded_store().await;
    store.insert_asset(asset(1)).await;
    store.insert_asset(asset(2)).await;
    store.fail_asset_loads(2).await;
    let app = common::build_test_app(store);

    let response = post(app, "/api/v1/organizations/1/health-check").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);
    let errors = json["data"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["asset_id"], 2);
}

#[tokio::test]
async fn unknown_organization_yields_empty_result() {
    let app = common::build_test_app(common::seeded_store().await);

    let response = post(app, "/api/v1/organizations/77/health-check").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 0);
}
