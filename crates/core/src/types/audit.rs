//! Audit log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuditLogId, Email, UserId};

/// One recorded administrative action.
///
/// Rows are written by the services that perform the actions; the HTTP API
/// only reads them, and only for admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Monotonic row ID. Newer entries have larger IDs.
    pub id: AuditLogId,
    /// When the action happened.
    pub occurred_at: DateTime<Utc>,
    /// Who performed it, when known.
    pub actor_id: Option<UserId>,
    /// Actor email at the time of the action.
    pub actor_email: Option<Email>,
    /// Action name, e.g. `order.refund`.
    pub action: String,
    /// Kind of resource acted upon, e.g. `order`.
    pub resource_type: String,
    /// Identifier of the resource, if any.
    pub resource_id: Option<String>,
    /// Free-form details.
    #[serde(default)]
    pub metadata: serde_json::Value,
}
