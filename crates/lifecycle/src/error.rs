//! Error types for the lifecycle engine.

use assetwatch_core::error::CoreError;
use assetwatch_core::types::DbId;
use serde::Serialize;

/// Failure reported by a [`LifecycleStore`](crate::LifecycleStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store could not serve the request.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// A domain-level error from `assetwatch_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One asset that failed inside a batch or monitor run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetError {
    pub asset_id: DbId,
    pub error: String,
}

impl AssetError {
    pub fn new(asset_id: DbId, error: &impl std::fmt::Display) -> Self {
        Self {
            asset_id,
            error: error.to_string(),
        }
    }
}
