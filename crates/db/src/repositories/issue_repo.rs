//! Repository for the `issues` table (read-only for the lifecycle engine).

use assetwatch_core::types::DbId;
use sqlx::PgPool;

/// Issue statuses that count towards an asset's open-issue volume.
pub const OPEN_ISSUE_STATUSES: &[&str] = &["open", "in_progress"];

/// Provides issue aggregates.
pub struct IssueRepo;

impl IssueRepo {
    /// Count issues for an asset whose status is open or in progress.
    pub async fn count_open_for_asset(pool: &PgPool, asset_id: DbId) -> Result<i64, sqlx::Error> {
        let statuses: Vec<String> = OPEN_ISSUE_STATUSES.iter().map(|s| s.to_string()).collect();
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM issues WHERE asset_id = $1 AND status = ANY($2)",
        )
        .bind(asset_id)
        .bind(&statuses)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
