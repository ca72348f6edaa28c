//! Per-request access log line.

use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::Response,
};

/// Log `"<METHOD> <PATH>"` for the request, then pass it on untouched.
///
/// Never short-circuits. Uses the path as the client sent it, before any
/// `nest` prefix stripping.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().path().to_owned(), |uri| uri.path().to_owned());

    tracing::info!(%method, %path, "{method} {path}");

    next.run(request).await
}
