//! Yieldcast: crop yield estimation service
//!
//! Library crate exposing all modules for use by tests and the binary
//! entry point.

pub mod config;
pub mod types;
pub mod reference;
pub mod data;
pub mod engine;
pub mod api;
