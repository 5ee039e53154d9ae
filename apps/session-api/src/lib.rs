pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod session;

use std::sync::Arc;

use config::Config;
use db::kv::KeyValueStore;
use session::record::UserRecords;
use session::stats::Statistics;
use session::sync::SyncCursorStore;
use session::token::{TokenValidator, ValidatedToken};

use crate::error::SessionError;

/// Session-state components sharing one injected store.
#[derive(Clone)]
pub struct SessionService {
    pub cursors: SyncCursorStore,
    pub tokens: TokenValidator,
    pub records: UserRecords,
    pub stats: Statistics,
}

impl SessionService {
    pub fn new(kv: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self {
            cursors: SyncCursorStore::new(kv.clone()),
            tokens: TokenValidator::new(kv.clone(), config.token_app_id),
            records: UserRecords::new(kv.clone()),
            stats: Statistics::new(kv),
        }
    }

    /// Validate a presented token and record the user as active.
    pub async fn open_session(&self, token: &str) -> Result<ValidatedToken, SessionError> {
        let session = self.tokens.validate(token).await?;
        let scope = im_common::UserScope::new(session.app_id, session.user_id);
        self.stats.count_user(scope).await;
        self.stats.count_dau(scope).await;
        tracing::debug!(%scope, "session opened");
        Ok(session)
    }
}

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub kv: Arc<dyn KeyValueStore>,
    pub session: SessionService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(kv: Arc<dyn KeyValueStore>, config: Config) -> Self {
        Self {
            session: SessionService::new(kv.clone(), &config),
            kv,
            config: Arc::new(config),
        }
    }
}
