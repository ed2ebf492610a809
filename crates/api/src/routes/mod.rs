pub mod assets;
pub mod health;
pub mod monitors;
pub mod organizations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /assets/{id}/health-check                 evaluate one asset (POST)
/// /assets/{id}/issue-reporting              issue-report gate (GET)
/// /assets/{id}/maintenance/start            start maintenance (POST)
/// /assets/{id}/maintenance/complete         complete maintenance (POST)
///
/// /organizations/{id}/health-check          evaluate every asset (POST)
///
/// /monitors/overdue-maintenance             overdue escalation (POST)
/// /monitors/warranty/expired                expired warranties (POST)
/// /monitors/warranty/expiring               expiring warranties (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/assets", assets::router())
        .nest("/organizations", organizations::router())
        .nest("/monitors", monitors::router())
}
