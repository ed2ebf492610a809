//! Handlers for per-asset lifecycle triggers.

use assetwatch_core::condition::{AssetCondition, STATUS_AVAILABLE};
use assetwatch_core::error::CoreError;
use assetwatch_core::types::DbId;
use assetwatch_db::models::asset::Asset;
use assetwatch_lifecycle::{AssetHealthReport, IssueReportingDecision};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::ActorParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn asset_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Asset", id })
}

/// Request body for `POST /assets/{id}/maintenance/start`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct StartMaintenanceRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Request body for `POST /assets/{id}/maintenance/complete`.
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteMaintenanceRequest {
    /// Condition after maintenance (default: `good`).
    #[serde(default = "default_condition")]
    pub condition: String,
    /// Status after maintenance (default: `available`).
    #[serde(default = "default_status")]
    #[validate(length(min = 1, max = 50))]
    pub status: String,
}

fn default_condition() -> String {
    AssetCondition::Good.as_str().to_string()
}

fn default_status() -> String {
    STATUS_AVAILABLE.to_string()
}

/// POST /api/v1/assets/{id}/health-check
///
/// Evaluate one asset and apply the recommended transition. Returns the full
/// analysis whether or not anything changed.
pub async fn check_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<AssetHealthReport>>> {
    let report = state
        .engine
        .check_asset(id, params.actor(), Utc::now())
        .await?
        .ok_or_else(|| asset_not_found(id))?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/assets/{id}/issue-reporting
///
/// Whether new issue reports may be filed against the asset.
pub async fn issue_reporting(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<IssueReportingDecision>>> {
    let decision = state
        .engine
        .issue_reporting_allowed(id, Utc::now())
        .await?
        .ok_or_else(|| asset_not_found(id))?;
    Ok(Json(DataResponse { data: decision }))
}

/// POST /api/v1/assets/{id}/maintenance/start
///
/// Returns 409 if the asset is already under maintenance.
pub async fn start_maintenance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
    Json(input): Json<StartMaintenanceRequest>,
) -> AppResult<Json<DataResponse<Asset>>> {
    input.validate()?;
    let asset = state
        .engine
        .start_maintenance(id, params.actor(), input.reason, Utc::now())
        .await?;
    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/assets/{id}/maintenance/complete
///
/// The only way to take an asset out of maintenance. Returns 409 if the asset
/// is not under maintenance.
pub async fn complete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ActorParams>,
    Json(input): Json<CompleteMaintenanceRequest>,
) -> AppResult<Json<DataResponse<Asset>>> {
    input.validate()?;
    let condition = AssetCondition::from_str(&input.condition)?;
    let asset = state
        .engine
        .complete_maintenance(id, params.actor(), condition, &input.status, Utc::now())
        .await?;
    Ok(Json(DataResponse { data: asset }))
}
