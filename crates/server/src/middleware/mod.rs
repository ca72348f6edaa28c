//! HTTP middleware for the server.
//!
//! # Audit log gate order (outermost first)
//!
//! 1. `log_request` - one `"<METHOD> <PATH>"` line per request
//! 2. `authenticate_token` - bearer token to `SessionUser`
//! 3. `require_admin` - admin role check
//!
//! The app-wide stack in `main` adds `TraceLayer` and the Sentry layers
//! around the whole router.

pub mod auth;
pub mod request_log;

pub use auth::{AuthRejection, CurrentUser, authenticate_token, require_admin};
pub use request_log::log_request;
