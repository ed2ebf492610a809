//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod asset_repo;
pub mod audit_repo;
pub mod issue_repo;
pub mod notification_repo;
pub mod organization_repo;
pub mod user_repo;

pub use asset_repo::AssetRepo;
pub use audit_repo::AuditLogRepo;
pub use issue_repo::IssueRepo;
pub use notification_repo::NotificationRepo;
pub use organization_repo::OrganizationRepo;
pub use user_repo::UserRepo;
