//! Periodic lifecycle jobs.
//!
//! Each job runs in its own task: sleep until the next fire time, run once,
//! repeat. A run is awaited before the next fire time is computed, so a job
//! never overlaps itself. The loop exits when the [`CancellationToken`] is
//! cancelled; an in-flight run finishes first.

use std::fmt;
use std::sync::Arc;

use assetwatch_core::types::Timestamp;
use assetwatch_lifecycle::{LifecycleEngine, LifecycleError};
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::schedule::Schedule;

/// The periodic entry points of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    HealthCheck,
    OverdueMaintenance,
    WarrantyExpired,
    WarrantyExpiring,
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HealthCheck => "health_check",
            Self::OverdueMaintenance => "overdue_maintenance",
            Self::WarrantyExpired => "warranty_expired",
            Self::WarrantyExpiring => "warranty_expiring",
        }
    }

    /// Run the job once at `now` and log its summary.
    pub async fn run_once(
        &self,
        engine: &LifecycleEngine,
        now: Timestamp,
    ) -> Result<(), LifecycleError> {
        let job = self.name();
        match self {
            Self::HealthCheck => {
                let result = engine.run_all_organizations(now).await?;
                tracing::info!(
                    job,
                    organizations = result.organizations.len(),
                    failed_organizations = result.failed.len(),
                    total = result.total_assets(),
                    updated = result.total_updated(),
                    errors = result.total_errors(),
                    "Job finished"
                );
            }
            Self::OverdueMaintenance => {
                let summary = engine.check_overdue_maintenance(now).await?;
                log_summary(job, &summary);
            }
            Self::WarrantyExpired => {
                let summary = engine.check_expired_warranties(now).await?;
                log_summary(job, &summary);
            }
            Self::WarrantyExpiring => {
                let summary = engine.check_expiring_warranties(now).await?;
                log_summary(job, &summary);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn log_summary(job: &str, summary: &assetwatch_lifecycle::MonitorSummary) {
    tracing::info!(
        job,
        checked = summary.checked,
        notified = summary.notified,
        skipped = summary.skipped,
        errors = summary.errors.len(),
        "Job finished"
    );
}

/// Run `job` on `schedule` until `cancel` fires.
pub async fn run(
    engine: Arc<LifecycleEngine>,
    job: Job,
    schedule: Schedule,
    cancel: CancellationToken,
) {
    let offset = engine.config().utc_offset;
    tracing::info!(job = job.name(), schedule = %schedule, "Job scheduled");

    loop {
        let now = Utc::now();
        let next = schedule.next_after(now, offset);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::debug!(job = job.name(), next = %next, "Waiting for next run");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(job = job.name(), "Job stopping");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                if let Err(e) = job.run_once(&engine, Utc::now()).await {
                    tracing::error!(job = job.name(), error = %e, "Job failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assetwatch_lifecycle::{LifecycleConfig, MemoryStore};
    use chrono::NaiveTime;

    use super::*;

    fn engine(store: Arc<MemoryStore>) -> Arc<LifecycleEngine> {
        Arc::new(LifecycleEngine::new(store, LifecycleConfig::default()))
    }

    #[tokio::test]
    async fn run_once_succeeds_on_empty_store() {
        let engine = engine(Arc::new(MemoryStore::new()));
        for job in [
            Job::HealthCheck,
            Job::OverdueMaintenance,
            Job::WarrantyExpired,
            Job::WarrantyExpiring,
        ] {
            assert!(job.run_once(&engine, Utc::now()).await.is_ok(), "{job}");
        }
    }

    #[tokio::test]
    async fn monitor_job_reports_store_failure() {
        let store = Arc::new(MemoryStore::new());
        store.set_unavailable(true).await;
        let engine = engine(store);

        let result = Job::WarrantyExpired.run_once(&engine, Utc::now()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn loop_exits_on_cancel() {
        let engine = engine(Arc::new(MemoryStore::new()));
        let cancel = CancellationToken::new();
        let schedule = Schedule::Daily {
            at: NaiveTime::MIN,
        };
        let handle = tokio::spawn(run(engine, Job::HealthCheck, schedule, cancel.clone()));

        cancel.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("job loop did not stop")
            .unwrap();
    }
}
