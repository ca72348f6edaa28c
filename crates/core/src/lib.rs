//! Tienda Core - Shared types library.
//!
//! This crate provides common types used across all Tienda components:
//! - `server` - HTTP API (audit log access gate, configuration, sessions)
//! - `shell` - Client application shell and its startup hooks
//! - `cli` - Command-line tools for migrations, tokens and bootstrap runs
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles and the JSON records shared by
//!   server and shell

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
