//! Per-asset lifecycle triggers, mounted under `/assets`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// ```text
/// POST   /{id}/health-check          -> check_asset
/// GET    /{id}/issue-reporting       -> issue_reporting
/// POST   /{id}/maintenance/start     -> start_maintenance
/// POST   /{id}/maintenance/complete  -> complete_maintenance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/health-check", post(assets::check_asset))
        .route("/{id}/issue-reporting", get(assets::issue_reporting))
        .route("/{id}/maintenance/start", post(assets::start_maintenance))
        .route(
            "/{id}/maintenance/complete",
            post(assets::complete_maintenance),
        )
}
