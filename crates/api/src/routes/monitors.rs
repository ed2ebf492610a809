//! Manual triggers for the periodic monitors, mounted under `/monitors`.

use axum::routing::post;
use axum::Router;

use crate::handlers::monitors;
use crate::state::AppState;

/// ```text
/// POST   /overdue-maintenance   -> check_overdue_maintenance
/// POST   /warranty/expired      -> check_expired_warranties
/// POST   /warranty/expiring     -> check_expiring_warranties
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/overdue-maintenance",
            post(monitors::check_overdue_maintenance),
        )
        .route("/warranty/expired", post(monitors::check_expired_warranties))
        .route("/warranty/expiring", post(monitors::check_expiring_warranties))
}
