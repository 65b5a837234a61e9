//! RiyalBot Backend Library
//!
//! Exposes the aggregation engine and its collaborators for the binary
//! and for integration tests.

pub mod api;
pub mod bot;
pub mod engine;
pub mod models;
pub mod scrapers;
