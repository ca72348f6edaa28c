//! Integration tests for Tienda.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no database needed)
//! cargo test -p tienda-integration-tests
//!
//! # Including the PostgreSQL store tests
//! TIENDA_TEST_DATABASE_URL=postgres://... cargo test -p tienda-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `audit_gate` - Audit log access gate over real HTTP with signed tokens
//! - `shell_bootstrap` - Client shell startup hooks against a live server
//! - `pg_audit_logs` - `PostgreSQL` audit log store (ignored by default)

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use futures::future::BoxFuture;
use secrecy::SecretString;

use tienda_core::{AuditLogEntry, AuditLogId, EcommerceConfig, Email, Role, SessionUser, UserId};
use tienda_server::db::{AuditLogQuery, AuditLogStore, RepositoryError};
use tienda_server::services::HmacTokenSigner;
use tienda_server::{AppState, router};

/// Signing secret shared by the test server and the tokens it accepts.
pub const TEST_SECRET: &str = "Hq8#vN2!pL6@wZ4$kT9%rB3^mC7&xD5*";

/// Audit log held in memory, served newest first like the real store.
#[derive(Debug, Default)]
pub struct InMemoryAuditLogs {
    entries: Vec<AuditLogEntry>,
}

impl InMemoryAuditLogs {
    /// Store with entries `1..=count`.
    #[must_use]
    pub fn seeded(count: i64) -> Self {
        Self {
            entries: (1..=count).map(entry).collect(),
        }
    }
}

impl AuditLogStore for InMemoryAuditLogs {
    fn list(
        &self,
        query: AuditLogQuery,
    ) -> BoxFuture<'_, Result<Vec<AuditLogEntry>, RepositoryError>> {
        let page = self
            .entries
            .iter()
            .rev()
            .filter(|e| query.before.is_none_or(|before| e.id.get() < before.get()))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .cloned()
            .collect();
        Box::pin(async move { Ok(page) })
    }

    fn get(&self, id: AuditLogId) -> BoxFuture<'_, Result<Option<AuditLogEntry>, RepositoryError>> {
        let found = self.entries.iter().find(|e| e.id == id).cloned();
        Box::pin(async move { Ok(found) })
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        Box::pin(async { Ok(()) })
    }
}

/// A Tienda server listening on an ephemeral loopback port.
pub struct TestServer {
    pub url: String,
    pub client: reqwest::Client,
    signer: HmacTokenSigner,
}

impl TestServer {
    /// Start a server over `audit_logs` with [`TEST_SECRET`] as signing key.
    pub async fn start(audit_logs: InMemoryAuditLogs) -> Self {
        let signer = HmacTokenSigner::new(SecretString::from(TEST_SECRET));
        let state = AppState::from_parts(
            ecommerce(),
            Arc::new(signer.clone()),
            Arc::new(audit_logs),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            signer,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn at(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    /// Token for `user` valid for an hour.
    #[must_use]
    pub fn token_for(&self, user: &SessionUser) -> String {
        self.signer.issue(user, Duration::hours(1)).unwrap()
    }

    /// Token for `user` that has already expired.
    #[must_use]
    pub fn expired_token_for(&self, user: &SessionUser) -> String {
        self.signer
            .issue_until(user, Utc::now() - Duration::minutes(1))
            .unwrap()
    }

    /// GET `path` with an optional bearer token.
    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.at(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.unwrap()
    }
}

#[must_use]
pub fn user(email: &str, role: Role) -> SessionUser {
    SessionUser {
        id: UserId::random(),
        email: Email::parse(email).unwrap(),
        name: email.split('@').next().unwrap_or_default().to_string(),
        role,
    }
}

#[must_use]
pub fn admin() -> SessionUser {
    user("lucia@tienda.es", Role::Admin)
}

#[must_use]
pub fn staff() -> SessionUser {
    user("jorge@tienda.es", Role::Staff)
}

#[must_use]
pub fn customer() -> SessionUser {
    user("pablo@correo.es", Role::Customer)
}

#[must_use]
pub fn entry(id: i64) -> AuditLogEntry {
    AuditLogEntry {
        id: AuditLogId::new(id),
        occurred_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(id),
        actor_id: None,
        actor_email: Some(Email::parse("lucia@tienda.es").unwrap()),
        action: "product.price_change".to_string(),
        resource_type: "product".to_string(),
        resource_id: Some(format!("prod_{id}")),
        metadata: serde_json::json!({ "from_cents": 1_999, "to_cents": 1_499 }),
    }
}

#[must_use]
pub fn ecommerce() -> EcommerceConfig {
    EcommerceConfig {
        store_name: "La Tienda".to_string(),
        currency: "EUR".to_string(),
        locale: "es-ES".to_string(),
        payment_methods: vec!["card".to_string(), "bizum".to_string()],
        free_shipping_threshold_cents: Some(4_900),
        support_email: Some(Email::parse("ayuda@tienda.es").unwrap()),
    }
}
