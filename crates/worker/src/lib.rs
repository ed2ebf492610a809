//! Scheduled runner for the asset lifecycle engine.

pub mod config;
pub mod jobs;
pub mod schedule;
