//! Identity of an authenticated caller.

use serde::{Deserialize, Serialize};

use super::{Email, Role, UserId};

/// The user a bearer token resolves to.
///
/// The server attaches it to request extensions once the token is verified,
/// and returns it from the session endpoint so the client shell can restore
/// its logged-in state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Stable user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Authorization role.
    pub role: Role,
}

impl SessionUser {
    /// Whether this user may access admin-only resources.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
