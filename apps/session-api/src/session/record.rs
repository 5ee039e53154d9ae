use std::sync::Arc;

use im_common::keys::{FORBIDDEN_FIELD, UNREAD_FIELD};
use im_common::UserScope;

use crate::db::kv::{hget_i64, hset_i64, KeyValueStore};
use crate::error::SessionError;
use crate::session::token::Forbidden;

/// Field access on per-user records outside of sync cursors.
#[derive(Clone)]
pub struct UserRecords {
    kv: Arc<dyn KeyValueStore>,
}

impl UserRecords {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Read the forbidden flag. Fails closed: an absent field or a storage
    /// error is returned to the caller rather than read as "allowed".
    pub async fn forbidden(&self, scope: UserScope) -> Result<Forbidden, SessionError> {
        let key = scope.record_key();
        let flag = hget_i64(self.kv.as_ref(), &key, FORBIDDEN_FIELD)
            .await
            .map_err(|e| {
                tracing::info!(?e, %key, "forbidden read failed");
                SessionError::Storage(e)
            })?
            .ok_or_else(|| SessionError::FieldNotFound {
                key: key.clone(),
                field: FORBIDDEN_FIELD,
            })?;
        Ok(Forbidden::from_flag(flag))
    }

    /// Overwrite the unread counter. Best effort.
    pub async fn set_unread_count(&self, scope: UserScope, count: i32) {
        let key = scope.record_key();
        if let Err(e) = hset_i64(self.kv.as_ref(), &key, UNREAD_FIELD, count.into()).await {
            tracing::info!(?e, %key, count, "unread count write failed");
        }
    }
}
