//! Incremental sync cursors.
//!
//! A cursor is the checkpoint a client resumes its next incremental fetch
//! from, kept per direct stream and per group membership. Cursors are
//! advisory: reads fail open to 0 (re-delivering already-seen data is
//! harmless) and writes are best effort. The store never compares or
//! decrements; the last write wins.

use std::sync::Arc;

use im_common::keys::{group_sync_field, SYNC_KEY_FIELD};
use im_common::{GroupId, UserScope};

use crate::db::kv::{hget_i64, hset_i64, KeyValueStore};

/// Position in a message stream. An unset cursor is 0.
pub type SyncCursor = i64;

#[derive(Clone)]
pub struct SyncCursorStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SyncCursorStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Cursor of the user's direct message stream.
    pub async fn user_cursor(&self, scope: UserScope) -> SyncCursor {
        self.read(scope, SYNC_KEY_FIELD).await
    }

    pub async fn set_user_cursor(&self, scope: UserScope, cursor: SyncCursor) {
        self.write(scope, SYNC_KEY_FIELD, cursor).await
    }

    /// Cursor of the user's membership in `group_id`.
    pub async fn group_cursor(&self, scope: UserScope, group_id: GroupId) -> SyncCursor {
        self.read(scope, &group_sync_field(group_id)).await
    }

    pub async fn set_group_cursor(&self, scope: UserScope, group_id: GroupId, cursor: SyncCursor) {
        self.write(scope, &group_sync_field(group_id), cursor).await
    }

    async fn read(&self, scope: UserScope, field: &str) -> SyncCursor {
        let key = scope.record_key();
        match hget_i64(self.kv.as_ref(), &key, field).await {
            Ok(cursor) => cursor.unwrap_or(0),
            Err(e) => {
                tracing::info!(?e, %key, field, "sync cursor read failed, starting from 0");
                0
            }
        }
    }

    async fn write(&self, scope: UserScope, field: &str, cursor: SyncCursor) {
        let key = scope.record_key();
        if let Err(e) = hset_i64(self.kv.as_ref(), &key, field, cursor).await {
            tracing::warn!(?e, %key, field, cursor, "sync cursor write failed");
        }
    }
}
