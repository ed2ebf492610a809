//! Domain logic for the asset health and lifecycle engine.
//!
//! Everything in this crate is pure: no database, no clock, no I/O. Callers
//! fetch inputs, pass an explicit `now`, and persist the results.

pub mod audit;
pub mod calendar;
pub mod condition;
pub mod error;
pub mod health;
pub mod notification;
pub mod roles;
pub mod types;
