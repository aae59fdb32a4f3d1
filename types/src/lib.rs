//! Shared types for the Hearth smart-home dashboard.
//!
//! This crate contains the API payloads exchanged between the dashboard
//! frontend and the home server.

/// Default port of the home server.
pub const DEFAULT_PORT: u16 = 8123;

/// Request header carrying the access password.
pub const ACCESS_HEADER: &str = "X-Hearth-Access";

pub mod api;

// Re-export commonly used types
pub use api::{ApiStatusResponse, ConfigResponse, EntityState};
