use assetwatch_core::types::DbId;
use assetwatch_lifecycle::BatchResult;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;

use crate::error::AppResult;
use crate::query::ActorParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/organizations/{id}/health-check
///
/// Evaluate every asset of the organization. Per-asset failures are listed in
/// `errors`; the request itself still succeeds.
pub async fn run_health_check(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<BatchResult>>> {
    let result = state
        .engine
        .run_organization_health_check(id, params.actor(), Utc::now())
        .await?;
    Ok(Json(DataResponse { data: result }))
}
