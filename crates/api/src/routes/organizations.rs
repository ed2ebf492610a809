use axum::routing::post;
use axum::Router;

use crate::handlers::organizations;
use crate::state::AppState;

/// Organization routes mounted at `/organizations`.
///
/// ```text
/// POST   /{id}/health-check   -> run_health_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/health-check", post(organizations::run_health_check))
}
