use std::sync::Arc;

use assetwatch_lifecycle::LifecycleEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Lifecycle engine over the configured store.
    pub engine: Arc<LifecycleEngine>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
