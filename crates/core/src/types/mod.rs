//! Core types for Tienda.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the records exchanged between the server and the client shell.

pub mod audit;
pub mod ecommerce;
pub mod email;
pub mod id;
pub mod role;
pub mod session;

pub use audit::AuditLogEntry;
pub use ecommerce::EcommerceConfig;
pub use email::{Email, EmailError};
pub use id::*;
pub use role::{Role, RoleParseError};
pub use session::SessionUser;
