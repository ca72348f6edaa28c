//! Authentication and authorization gates.
//!
//! [`authenticate_token`] resolves the bearer token into a [`SessionUser`]
//! stored in the request extensions; [`require_admin`] then checks that the
//! attached user has the admin role. Handlers behind both read the user with
//! the [`CurrentUser`] extractor.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use tienda_core::SessionUser;

use crate::error::set_sentry_user;
use crate::state::AppState;

/// Error returned when a request does not pass a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization: Bearer` header.
    MissingToken,
    /// Token present but not trusted.
    InvalidToken,
    /// Authorization ran without an authenticated user attached.
    Unauthenticated,
    /// Caller is authenticated but not an admin.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "Missing bearer token"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Admin access required"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(request: &Request) -> Option<&str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Middleware that requires a valid bearer token.
///
/// On success the resolved [`SessionUser`] is inserted into the request
/// extensions before calling onward.
///
/// # Errors
///
/// Rejects with 401 when the header is missing or the token does not verify.
pub async fn authenticate_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = bearer_token(&request).ok_or(AuthRejection::MissingToken)?;

    let user = state.tokens().verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        AuthRejection::InvalidToken
    })?;

    set_sentry_user(&user);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Middleware that requires the authenticated user to be an admin.
///
/// Must run after [`authenticate_token`].
///
/// # Errors
///
/// Rejects with 401 when no user is attached, 403 when the user is not an
/// admin.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AuthRejection> {
    let user = request
        .extensions()
        .get::<SessionUser>()
        .ok_or(AuthRejection::Unauthenticated)?;

    if !user.is_admin() {
        tracing::info!(user_id = %user.id, role = %user.role, "Admin access denied");
        return Err(AuthRejection::Forbidden);
    }

    Ok(next.run(request).await)
}

/// Extractor for the user attached by [`authenticate_token`].
///
/// # Example
///
/// ```rust,ignore
/// async fn whoami(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct CurrentUser(pub SessionUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(Self)
            .ok_or(AuthRejection::Unauthenticated)
    }
}
