//! Fakes and log capture shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use futures::future::BoxFuture;
use tracing_subscriber::fmt::MakeWriter;

use tienda_core::{AuditLogEntry, AuditLogId, EcommerceConfig, Email, Role, SessionUser, UserId};

use crate::db::{AuditLogQuery, AuditLogStore, RepositoryError};
use crate::services::{TokenError, TokenVerifier};
use crate::state::AppState;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const CUSTOMER_TOKEN: &str = "customer-token";

/// Collects formatted tracing output in memory.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install as the thread-local subscriber until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }
}

pub struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(Arc::clone(&self.0))
    }
}

/// Accepts two fixed tokens.
pub struct FakeTokens {
    pub admin: SessionUser,
    pub customer: SessionUser,
}

impl Default for FakeTokens {
    fn default() -> Self {
        Self {
            admin: user("lucia@tienda.es", "Lucía", Role::Admin),
            customer: user("pablo@correo.es", "Pablo", Role::Customer),
        }
    }
}

impl TokenVerifier for FakeTokens {
    fn verify(&self, token: &str) -> Result<SessionUser, TokenError> {
        match token {
            ADMIN_TOKEN => Ok(self.admin.clone()),
            CUSTOMER_TOKEN => Ok(self.customer.clone()),
            _ => Err(TokenError::BadSignature),
        }
    }
}

/// In-memory audit store that counts handler calls.
#[derive(Default)]
pub struct FakeAuditLogs {
    pub entries: Vec<AuditLogEntry>,
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeAuditLogs {
    pub fn with_entries(count: i64) -> Self {
        Self {
            entries: (1..=count).map(entry).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn outcome<T>(&self, value: T) -> Result<T, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(value)
        }
    }
}

impl AuditLogStore for FakeAuditLogs {
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
        Box::pin(async move { self.outcome(page) })
    }

    fn get(&self, id: AuditLogId) -> BoxFuture<'_, Result<Option<AuditLogEntry>, RepositoryError>> {
        let found = self.entries.iter().find(|e| e.id == id).cloned();
        Box::pin(async move { self.outcome(found) })
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        Box::pin(async move {
            if self.fail {
                Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
            } else {
                Ok(())
            }
        })
    }
}

pub fn user(email: &str, name: &str, role: Role) -> SessionUser {
    SessionUser {
        id: UserId::random(),
        email: Email::parse(email).unwrap_or_else(|e| panic!("bad test email {email}: {e}")),
        name: name.to_string(),
        role,
    }
}

pub fn entry(id: i64) -> AuditLogEntry {
    AuditLogEntry {
        id: AuditLogId::new(id),
        occurred_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        actor_id: None,
        actor_email: None,
        action: "order.refund".to_string(),
        resource_type: "order".to_string(),
        resource_id: Some(format!("ord_{id}")),
        metadata: serde_json::json!({ "amount_cents": id * 100 }),
    }
}

pub fn ecommerce() -> EcommerceConfig {
    EcommerceConfig {
        store_name: "La Tienda".to_string(),
        currency: "EUR".to_string(),
        locale: "es-ES".to_string(),
        payment_methods: vec!["card".to_string(), "bizum".to_string()],
        free_shipping_threshold_cents: Some(4_900),
        support_email: None,
    }
}

pub fn state_with(audit_logs: Arc<FakeAuditLogs>) -> AppState {
    AppState::from_parts(ecommerce(), Arc::new(FakeTokens::default()), audit_logs)
}
