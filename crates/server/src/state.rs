//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use tienda_core::EcommerceConfig;

use crate::config::ServerConfig;
use crate::db::{AuditLogStore, PgAuditLogStore};
use crate::services::{HmacTokenSigner, TokenVerifier};

/// Application state shared across all handlers.
///
/// Cheap to clone; every collaborator is behind an `Arc` and never mutated
/// after start-up.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    ecommerce: EcommerceConfig,
    tokens: Arc<dyn TokenVerifier>,
    audit_logs: Arc<dyn AuditLogStore>,
}

impl AppState {
    /// Build production state from configuration and a database pool.
    #[must_use]
    pub fn new(config: &ServerConfig, pool: PgPool) -> Self {
        Self::from_parts(
            config.ecommerce.clone(),
            Arc::new(HmacTokenSigner::new(config.token_secret().clone())),
            Arc::new(PgAuditLogStore::new(pool)),
        )
    }

    /// Build state from explicit collaborators.
    #[must_use]
    pub fn from_parts(
        ecommerce: EcommerceConfig,
        tokens: Arc<dyn TokenVerifier>,
        audit_logs: Arc<dyn AuditLogStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                ecommerce,
                tokens,
                audit_logs,
            }),
        }
    }

    /// Storefront configuration served to client shells.
    #[must_use]
    pub fn ecommerce(&self) -> &EcommerceConfig {
        &self.inner.ecommerce
    }

    /// Bearer token verifier used by the authentication gate.
    #[must_use]
    pub fn tokens(&self) -> &dyn TokenVerifier {
        self.inner.tokens.as_ref()
    }

    /// Audit log store read by the admin-only handlers.
    #[must_use]
    pub fn audit_logs(&self) -> &dyn AuditLogStore {
        self.inner.audit_logs.as_ref()
    }
}
