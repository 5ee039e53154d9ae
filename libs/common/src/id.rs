use std::fmt;

use serde::{Deserialize, Serialize};

/// Tenant (application) identifier.
pub type AppId = i64;

/// User identifier, unique within a tenant.
pub type UserId = i64;

/// Group conversation identifier.
pub type GroupId = i64;

/// Tenant used by the single-tenant token table unless configured otherwise.
pub const DEFAULT_APP_ID: AppId = 1;

/// Addresses exactly one per-user record in the cache.
///
/// The record is a hash holding independent fields (direct sync cursor,
/// per-group cursors, forbidden flag, unread count). It is created on first
/// write and never deleted by this workspace.
///
/// # Examples
/// ```
/// let scope = im_common::UserScope::new(1, 42);
/// assert_eq!(scope.record_key(), "users_1_42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserScope {
    pub app_id: AppId,
    pub user_id: UserId,
}

impl UserScope {
    pub fn new(app_id: AppId, user_id: UserId) -> Self {
        Self { app_id, user_id }
    }

    /// Cache key of the hash record backing this scope.
    pub fn record_key(&self) -> String {
        crate::keys::user_record_key(self.app_id, self.user_id)
    }
}

impl fmt::Display for UserScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_id, self.user_id)
    }
}
