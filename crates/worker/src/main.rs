use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use assetwatch_lifecycle::{LifecycleConfig, LifecycleEngine, PgLifecycleStore};
use assetwatch_worker::config::WorkerConfig;
use assetwatch_worker::jobs::{self, Job};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long each job gets to finish an in-flight run after shutdown starts.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assetwatch_worker=debug,assetwatch_lifecycle=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let lifecycle_config =
        LifecycleConfig::from_env().context("Invalid lifecycle configuration")?;
    let worker_config = WorkerConfig::from_env().context("Invalid worker schedule")?;
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    // --- Database ---
    let pool = assetwatch_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    assetwatch_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database connection pool created");

    let store = Arc::new(PgLifecycleStore::new(pool));
    let engine = Arc::new(LifecycleEngine::new(store, lifecycle_config));

    // --- Jobs ---
    let cancel = CancellationToken::new();
    let handles: Vec<_> = [
        (Job::HealthCheck, worker_config.health_check),
        (Job::OverdueMaintenance, worker_config.overdue_maintenance),
        (Job::WarrantyExpired, worker_config.warranty_expired),
        (Job::WarrantyExpiring, worker_config.warranty_expiring),
    ]
    .into_iter()
    .map(|(job, schedule)| {
        tokio::spawn(jobs::run(
            Arc::clone(&engine),
            job,
            schedule,
            cancel.clone(),
        ))
    })
    .collect();

    tracing::info!(jobs = handles.len(), "Worker started");

    shutdown_signal().await;
    cancel.cancel();

    for handle in handles {
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await.is_err() {
            tracing::warn!("Job did not stop within the shutdown timeout");
        }
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, stopping jobs"),
        () = terminate => tracing::info!("Received SIGTERM, stopping jobs"),
    }
}
