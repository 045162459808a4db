//! HTTP surface for the tubely upload service.
//!
//! Exposed as a library so integration tests can assemble the router with
//! fake repositories, storage backends, and media tools.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
