//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and the DTOs used for inserts and partial updates.

pub mod asset;
pub mod audit;
pub mod notification;
