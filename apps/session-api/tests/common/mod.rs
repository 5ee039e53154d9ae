#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use session_api::config::Config;
use session_api::db::kv::{KeyValueStore, KvError, MemoryStore};
use session_api::session::token::{encode, AuthInfo, Forbidden};
use session_api::AppState;

/// Config pointing nowhere; tests always inject their own store.
pub fn test_config() -> Config {
    Config {
        redis_url: "redis://localhost:6379/15".to_string(),
        port: 0,
        token_app_id: 1,
    }
}

/// Build a test AppState on an in-memory store.
pub fn test_state() -> (AppState, Arc<MemoryStore>) {
    let kv = Arc::new(MemoryStore::new());
    let state = AppState::new(kv.clone(), test_config());
    (state, kv)
}

pub fn test_app() -> (Router, AppState, Arc<MemoryStore>) {
    let (state, kv) = test_state();
    let app = session_api::routes::router().with_state(state.clone());
    (app, state, kv)
}

/// Put a token payload straight into the token table.
pub async fn seed_token(
    kv: &dyn KeyValueStore,
    token: &[u8],
    user_id: i64,
    forbidden: bool,
    notification_on: bool,
) {
    let info = AuthInfo {
        user_id,
        forbidden: Forbidden::from(forbidden),
        notification_on,
    };
    kv.hset("im_access_token", token, &encode(&info))
        .await
        .expect("seed token");
}

/// Store whose every command fails, as if Redis were unreachable.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn hget(&self, _key: &str, _field: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        Err(KvError::Backend("connection refused".to_string()))
    }

    async fn hset(&self, _key: &str, _field: &[u8], _value: &[u8]) -> Result<(), KvError> {
        Err(KvError::Backend("connection refused".to_string()))
    }

    async fn pfadd(&self, _key: &str, _member: &[u8]) -> Result<bool, KvError> {
        Err(KvError::Backend("connection refused".to_string()))
    }

    async fn pfcount(&self, _key: &str) -> Result<u64, KvError> {
        Err(KvError::Backend("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), KvError> {
        Err(KvError::Backend("connection refused".to_string()))
    }
}

/// Memory store that counts hash lookups.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub lookups: AtomicUsize,
}

impl CountingStore {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn hget(&self, key: &str, field: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.hget(key, field).await
    }

    async fn hset(&self, key: &str, field: &[u8], value: &[u8]) -> Result<(), KvError> {
        self.inner.hset(key, field, value).await
    }

    async fn pfadd(&self, key: &str, member: &[u8]) -> Result<bool, KvError> {
        self.inner.pfadd(key, member).await
    }

    async fn pfcount(&self, key: &str) -> Result<u64, KvError> {
        self.inner.pfcount(key).await
    }

    async fn ping(&self) -> Result<(), KvError> {
        self.inner.ping().await
    }
}
