//! Well-known role name constants.
//!
//! These must match the values accepted by the `users.role` check constraint.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_PRINCIPAL: &str = "principal";
pub const ROLE_STAFF: &str = "staff";

/// Roles notified when an asset enters maintenance or overstays it.
pub const MAINTENANCE_RECIPIENT_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];

/// Roles notified about expired and expiring warranties.
pub const WARRANTY_RECIPIENT_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_PRINCIPAL];
