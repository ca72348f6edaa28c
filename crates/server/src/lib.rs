//! Tienda server library.
//!
//! This crate provides the HTTP API as a library so the router can be
//! exercised in-process by tests and reused by the CLI (token issuing,
//! migrations).
//!
//! # Security
//!
//! Audit log endpoints are admin-only: every request under
//! `/api/audit-logs` is logged, then must carry a valid bearer token, then
//! must belong to an admin.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ServerConfig;
pub use routes::router;
pub use state::AppState;
