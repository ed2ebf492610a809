#![allow(dead_code)]

use std::sync::Arc;

use assetwatch_api::config::ServerConfig;
use assetwatch_api::router::build_app_router;
use assetwatch_api::state::AppState;
use assetwatch_core::condition::STATUS_AVAILABLE;
use assetwatch_core::roles::{ROLE_ADMIN, ROLE_MANAGER};
use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::asset::Asset;
use assetwatch_lifecycle::{LifecycleConfig, LifecycleEngine, MemoryStore, MemoryUser};
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const ORG: DbId = 1;
pub const ADMIN: DbId = 100;
pub const MANAGER: DbId = 101;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router over an in-memory store.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    let config = test_config();
    let engine = Arc::new(LifecycleEngine::new(store, LifecycleConfig::default()));
    let state = AppState {
        engine,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Store with an admin and a manager in [`ORG`].
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (id, role) in [(ADMIN, ROLE_ADMIN), (MANAGER, ROLE_MANAGER)] {
        store
            .insert_user(MemoryUser {
                id,
                organization_id: ORG,
                role: role.to_string(),
                is_active: true,
            })
            .await;
    }
    store
}

pub fn days_ago(days: i64) -> Timestamp {
    Utc::now() - Duration::days(days)
}

/// A healthy `good`/`available` asset in [`ORG`].
pub fn asset(id: DbId) -> Asset {
    let created = days_ago(30);
    Asset {
        id,
        organization_id: ORG,
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

/// An asset in maintenance since `days` days ago.
pub fn asset_in_maintenance(id: DbId, days: i64) -> Asset {
    Asset {
        condition: "under_maintenance".to_string(),
        status: "under_maintenance".to_string(),
        maintenance_reason: Some("manual".to_string()),
        maintenance_start_date: Some(days_ago(days)),
        ..asset(id)
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
