//! Shared infrastructure for Inkwell services.
//!
//! Provides tracing setup, the request-id layer, health endpoints and
//! serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
