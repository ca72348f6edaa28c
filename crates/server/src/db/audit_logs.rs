//! Audit log reads.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use sqlx::PgPool;

use tienda_core::{AuditLogEntry, AuditLogId, Email, UserId};

use super::RepositoryError;

/// Page request for the audit log, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Maximum number of entries to return.
    pub limit: i64,
    /// Only return entries with an ID lower than this (keyset pagination).
    pub before: Option<AuditLogId>,
}

impl AuditLogQuery {
    /// Default page size.
    pub const DEFAULT_LIMIT: i64 = 50;
    /// Largest page a caller may request.
    pub const MAX_LIMIT: i64 = 200;

    /// Build a query, clamping `limit` into `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(limit: Option<i64>, before: Option<AuditLogId>) -> Self {
        Self {
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            before,
        }
    }
}

/// Read access to stored audit log entries.
///
/// Object safe so the router can hold it as `Arc<dyn AuditLogStore>`.
pub trait AuditLogStore: Send + Sync {
    /// Fetch a page of entries, newest first.
    fn list(
        &self,
        query: AuditLogQuery,
    ) -> BoxFuture<'_, Result<Vec<AuditLogEntry>, RepositoryError>>;

    /// Fetch a single entry.
    fn get(&self, id: AuditLogId) -> BoxFuture<'_, Result<Option<AuditLogEntry>, RepositoryError>>;

    /// Check that the backing store is reachable.
    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>>;
}

/// `PostgreSQL`-backed audit log store.
#[derive(Clone)]
pub struct PgAuditLogStore {
    pool: PgPool,
}

impl PgAuditLogStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AuditLogRow {
    id: AuditLogId,
    occurred_at: DateTime<Utc>,
    actor_id: Option<UserId>,
    actor_email: Option<Email>,
    action: String,
    resource_type: String,
    resource_id: Option<String>,
    metadata: serde_json::Value,
}

impl From<AuditLogRow> for AuditLogEntry {
    fn from(row: AuditLogRow) -> Self {
        Self {
            id: row.id,
            occurred_at: row.occurred_at,
            actor_id: row.actor_id,
            actor_email: row.actor_email,
            action: row.action,
            resource_type: row.resource_type,
            resource_id: row.resource_id,
            metadata: row.metadata,
        }
    }
}

impl AuditLogStore for PgAuditLogStore {
    fn list(
        &self,
        query: AuditLogQuery,
    ) -> BoxFuture<'_, Result<Vec<AuditLogEntry>, RepositoryError>> {
        Box::pin(async move {
            let rows = sqlx::query_as::<_, AuditLogRow>(
                r"
                SELECT id, occurred_at, actor_id, actor_email, action,
                       resource_type, resource_id, metadata
                FROM audit.audit_log
                WHERE ($1::BIGINT IS NULL OR id < $1)
                ORDER BY id DESC
                LIMIT $2
                ",
            )
            .bind(query.before)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.into_iter().map(AuditLogEntry::from).collect())
        })
    }

    fn get(&self, id: AuditLogId) -> BoxFuture<'_, Result<Option<AuditLogEntry>, RepositoryError>> {
        Box::pin(async move {
            let row = sqlx::query_as::<_, AuditLogRow>(
                r"
                SELECT id, occurred_at, actor_id, actor_email, action,
                       resource_type, resource_id, metadata
                FROM audit.audit_log
                WHERE id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.map(AuditLogEntry::from))
        })
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        Box::pin(async move {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
    }
}
