//! Session restore endpoint.
//!
//! Client shells call this at startup with their persisted bearer token to
//! learn whether the session is still valid and who it belongs to.

use axum::{Json, Router, middleware, routing::get};
use tower::ServiceBuilder;

use tienda_core::SessionUser;

use crate::middleware::{CurrentUser, authenticate_token, log_request};
use crate::state::AppState;

/// Routes under `/api/auth`. Authentication only, no role check.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new().route("/session", get(show)).layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(log_request))
            .layer(middleware::from_fn_with_state(state, authenticate_token)),
    )
}

/// `GET /api/auth/session` - the user the bearer token belongs to.
async fn show(CurrentUser(user): CurrentUser) -> Json<SessionUser> {
    Json(user)
}
