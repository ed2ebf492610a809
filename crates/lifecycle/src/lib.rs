//! Asset health and lifecycle engine.
//!
//! Building blocks, leaves first:
//!
//! - [`NotificationDispatcher`] -- recipient resolution, dedup checks, fan-out.
//! - [`AuditRecorder`] -- append-only audit entries for transitions.
//! - [`LifecycleTransitioner`] -- one evaluate-and-apply cycle for one asset.
//! - [`ScheduledEvaluator`] -- sequential, continue-on-error batch per organization.
//! - [`OverdueMaintenanceMonitor`] and [`WarrantyMonitor`] -- periodic alert jobs.
//! - [`MaintenanceActions`] -- the manual start/complete maintenance actions.
//! - [`LifecycleEngine`] -- facade wiring everything over one [`LifecycleStore`].
//!
//! Every operation takes `now` explicitly so jobs can be driven synchronously
//! with a controlled clock.

pub mod audit;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod maintenance;
pub mod memory;
pub mod monitors;
pub mod pg_store;
pub mod store;
pub mod templates;
pub mod transitioner;

pub use audit::AuditRecorder;
pub use config::LifecycleConfig;
pub use dispatcher::NotificationDispatcher;
pub use engine::{IssueReportingDecision, LifecycleEngine};
pub use error::{AssetError, LifecycleError, StoreError};
pub use evaluator::{AllOrganizationsResult, BatchResult, OrganizationError, ScheduledEvaluator};
pub use maintenance::MaintenanceActions;
pub use memory::{MemoryStore, MemoryUser, StoredNotification};
pub use monitors::{MonitorSummary, OverdueMaintenanceMonitor, WarrantyMonitor};
pub use pg_store::PgLifecycleStore;
pub use store::LifecycleStore;
pub use templates::NotificationTemplate;
pub use transitioner::{AssetHealthReport, LifecycleTransitioner};
