//! Manual triggers for the periodic monitors.
//!
//! Each runs the same job the worker schedules, at the current time.

use assetwatch_lifecycle::MonitorSummary;
use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/monitors/overdue-maintenance
pub async fn check_overdue_maintenance(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MonitorSummary>>> {
    let summary = state.engine.check_overdue_maintenance(Utc::now()).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/monitors/warranty/expired
pub async fn check_expired_warranties(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MonitorSummary>>> {
    let summary = state.engine.check_expired_warranties(Utc::now()).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/monitors/warranty/expiring
pub async fn check_expiring_warranties(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MonitorSummary>>> {
    let summary = state.engine.check_expiring_warranties(Utc::now()).await?;
    Ok(Json(DataResponse { data: summary }))
}
