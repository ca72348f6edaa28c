//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness
//! GET  /health/ready            - Readiness (audit store reachable)
//!
//! # Public
//! GET  /api/config/ecommerce    - Storefront configuration
//!
//! # Bearer token required
//! GET  /api/auth/session        - Current session user
//!
//! # Bearer token + admin role required
//! GET  /api/audit-logs          - Audit log page
//! GET  /api/audit-logs/{id}     - Audit log entry
//! ```

pub mod audit_logs;
pub mod ecommerce;
pub mod health;
pub mod session;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the application router with state applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/config/ecommerce", get(ecommerce::show))
        .nest("/api/auth", session::routes(state.clone()))
        .nest("/api/audit-logs", audit_logs::routes(state.clone()))
        .with_state(state)
}
