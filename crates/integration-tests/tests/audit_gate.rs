//! Integration tests for the audit log access gate.
//!
//! These run the full router over real HTTP with HMAC-signed bearer tokens,
//! so they cover token parsing, verification and the role check together.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::Value;

use tienda_integration_tests::{InMemoryAuditLogs, TestServer, admin, customer, staff};

async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = TestServer::start(InMemoryAuditLogs::seeded(3)).await;

    let response = server.get("/api/audit-logs", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, "Missing bearer token");
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let server = TestServer::start(InMemoryAuditLogs::seeded(3)).await;
    let mut token = server.token_for(&admin());
    // Flip the last hex digit of the signature
    let last = token.pop().unwrap();
    token.push(if last == '0' { '1' } else { '0' });

    let response = server.get("/api/audit-logs", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(response).await, "Invalid or expired token");
}

#[tokio::test]
async fn test_expired_admin_token_is_unauthorized() {
    let server = TestServer::start(InMemoryAuditLogs::seeded(3)).await;
    let token = server.expired_token_for(&admin());

    let response = server.get("/api/audit-logs", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let server = TestServer::start(InMemoryAuditLogs::seeded(3)).await;

    let response = server
        .client
        .get(server.at("/api/audit-logs"))
        .basic_auth("lucia", Some("hunter2"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Authorization
// =============================================================================

#[tokio::test]
async fn test_non_admin_roles_are_forbidden() {
    let server = TestServer::start(InMemoryAuditLogs::seeded(3)).await;

    for user in [customer(), staff()] {
        let token = server.token_for(&user);
        let response = server.get("/api/audit-logs", Some(&token)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "role {}", user.role);
        assert_eq!(error_message(response).await, "Admin access required");
    }
}

#[tokio::test]
async fn test_unknown_subpath_is_gated_before_404() {
    let server = TestServer::start(InMemoryAuditLogs::seeded(3)).await;

    let anonymous = server.get("/api/audit-logs/export/csv", None).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let token = server.token_for(&customer());
    let forbidden = server.get("/api/audit-logs/export/csv", Some(&token)).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let token = server.token_for(&admin());
    let missing = server.get("/api/audit-logs/export/csv", Some(&token)).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Admin access
// =============================================================================

#[tokio::test]
async fn test_admin_pages_through_entries() {
    let server = TestServer::start(InMemoryAuditLogs::seeded(5)).await;
    let token = server.token_for(&admin());

    let first: Vec<Value> = server
        .get("/api/audit-logs?limit=2", Some(&token))
        .await
        .json()
        .await
        .unwrap();
    let ids: Vec<i64> = first.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [5, 4]);

    let next: Vec<Value> = server
        .get("/api/audit-logs?limit=2&before=4", Some(&token))
        .await
        .json()
        .await
        .unwrap();
    let ids: Vec<i64> = next.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [3, 2]);
}

#[tokio::test]
async fn test_admin_reads_single_entry() {
    let server = TestServer::start(InMemoryAuditLogs::seeded(3)).await;
    let token = server.token_for(&admin());

    let response = server.get("/api/audit-logs/2", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let entry: Value = response.json().await.unwrap();
    assert_eq!(entry["resource_id"], "prod_2");
    assert_eq!(entry["actor_email"], "lucia@tienda.es");

    let missing = server.get("/api/audit-logs/99", Some(&token)).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Routes outside the gate
// =============================================================================

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let server = TestServer::start(InMemoryAuditLogs::default()).await;

    assert_eq!(server.get("/health", None).await.status(), StatusCode::OK);
    assert_eq!(server.get("/health/ready", None).await.status(), StatusCode::OK);

    let config: Value = server
        .get("/api/config/ecommerce", None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(config["store_name"], "La Tienda");
    assert_eq!(config["support_email"], "ayuda@tienda.es");
}

#[tokio::test]
async fn test_session_endpoint_needs_token_but_not_admin() {
    let server = TestServer::start(InMemoryAuditLogs::default()).await;
    let user = customer();
    let token = server.token_for(&user);

    let anonymous = server.get("/api/auth/session", None).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let response = server.get("/api/auth/session", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "pablo@correo.es");
    assert_eq!(body["role"], "customer");
    assert_eq!(body["id"], user.id.to_string());
}
