//! Admin-only audit log endpoints.
//!
//! ```text
//! GET /api/audit-logs?limit=&before=   - Newest-first page
//! GET /api/audit-logs/{id}             - Single entry
//! ```
//!
//! Every request under this router, matched or not, passes through
//! `log_request`, then `authenticate_token`, then `require_admin`.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    middleware,
    routing::get,
};
use serde::Deserialize;
use tower::ServiceBuilder;

use tienda_core::{AuditLogEntry, AuditLogId};

use crate::db::AuditLogQuery;
use crate::error::AppError;
use crate::middleware::{authenticate_token, log_request, require_admin};
use crate::state::AppState;

/// Query string for the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Page size (clamped to 1..=200, default 50).
    pub limit: Option<i64>,
    /// Return entries older than this ID.
    pub before: Option<i64>,
}

/// Audit log routes with the access gate applied.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(show))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_request))
                .layer(middleware::from_fn_with_state(state, authenticate_token))
                .layer(middleware::from_fn(require_admin)),
        )
}

async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<AuditLogEntry>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = AuditLogQuery::new(params.limit, params.before.map(AuditLogId::new));
    let entries = state.audit_logs().list(query).await?;
    Ok(Json(entries))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AuditLogEntry>, AppError> {
    let id = AuditLogId::new(id);
    state
        .audit_logs()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("audit log {id}")))
}

async fn not_found() -> AppError {
    AppError::NotFound("no such audit log resource".to_string())
}
