use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Failure reported by a [`KeyValueStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// The backend could not be reached or rejected the command.
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored value could not be read as the expected type.
    #[error("invalid value for {key}.{field}")]
    InvalidValue { key: String, field: String },
}

impl From<redis::RedisError> for KvError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Abstraction over the shared cache holding per-user records, the token
/// table and the engagement counters.
///
/// Backed by Redis in production and an in-memory map in tests. Every method
/// is a single request/response round trip.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn hget(&self, key: &str, field: &[u8]) -> Result<Option<Vec<u8>>, KvError>;
    async fn hset(&self, key: &str, field: &[u8], value: &[u8]) -> Result<(), KvError>;
    /// Add `member` to the approximate-distinct counter at `key`. Returns
    /// whether the estimate changed.
    async fn pfadd(&self, key: &str, member: &[u8]) -> Result<bool, KvError>;
    async fn pfcount(&self, key: &str) -> Result<u64, KvError>;
    async fn ping(&self) -> Result<(), KvError>;
}

/// Read an integer hash field. Integers are stored as decimal strings.
pub async fn hget_i64(
    kv: &dyn KeyValueStore,
    key: &str,
    field: &str,
) -> Result<Option<i64>, KvError> {
    let Some(raw) = kv.hget(key, field.as_bytes()).await? else {
        return Ok(None);
    };
    std::str::from_utf8(&raw)
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| KvError::InvalidValue {
            key: key.to_string(),
            field: field.to_string(),
        })
}

pub async fn hset_i64(
    kv: &dyn KeyValueStore,
    key: &str,
    field: &str,
    value: i64,
) -> Result<(), KvError> {
    kv.hset(key, field.as_bytes(), value.to_string().as_bytes())
        .await
}

// ---------------------------------------------------------------------------
// Redis implementation
// ---------------------------------------------------------------------------

/// Redis-backed store. The connection manager is cloned per call, so each
/// operation holds its handle only for the duration of one command.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, KvError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("redis connection manager created");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn hget(&self, key: &str, field: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.hget(key, field).await?;
        Ok(value)
    }

    async fn hset(&self, key: &str, field: &[u8], value: &[u8]) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(key, field, value).await?;
        Ok(())
    }

    async fn pfadd(&self, key: &str, member: &[u8]) -> Result<bool, KvError> {
        let mut conn = self.conn.clone();
        let changed: bool = conn.pfadd(key, member).await?;
        Ok(changed)
    }

    async fn pfcount(&self, key: &str) -> Result<u64, KvError> {
        let mut conn = self.conn.clone();
        let count: u64 = conn.pfcount(key).await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation (for tests and local runs)
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryData {
    hashes: HashMap<String, HashMap<Vec<u8>, Vec<u8>>>,
    // Exact sets: the estimate is the true cardinality.
    counters: HashMap<String, HashSet<Vec<u8>>>,
}

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn hget(&self, key: &str, field: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        let data = self.data.lock();
        Ok(data.hashes.get(key).and_then(|h| h.get(field)).cloned())
    }

    async fn hset(&self, key: &str, field: &[u8], value: &[u8]) -> Result<(), KvError> {
        self.data
            .lock()
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_vec(), value.to_vec());
        Ok(())
    }

    async fn pfadd(&self, key: &str, member: &[u8]) -> Result<bool, KvError> {
        Ok(self
            .data
            .lock()
            .counters
            .entry(key.to_string())
            .or_default()
            .insert(member.to_vec()))
    }

    async fn pfcount(&self, key: &str) -> Result<u64, KvError> {
        let data = self.data.lock();
        Ok(data.counters.get(key).map_or(0, |s| s.len() as u64))
    }

    async fn ping(&self) -> Result<(), KvError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hget_missing_field_is_none() {
        let kv = MemoryStore::new();
        assert!(kv.hget("users_1_1", b"sync_key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn integer_fields_round_trip_as_decimal() {
        let kv = MemoryStore::new();
        hset_i64(&kv, "users_1_1", "unread", -12).await.unwrap();

        let raw = kv.hget("users_1_1", b"unread").await.unwrap().unwrap();
        assert_eq!(raw, b"-12");
        assert_eq!(hget_i64(&kv, "users_1_1", "unread").await.unwrap(), Some(-12));
    }

    #[tokio::test]
    async fn non_integer_field_is_invalid_value() {
        let kv = MemoryStore::new();
        kv.hset("users_1_1", b"sync_key", b"abc").await.unwrap();

        let err = hget_i64(&kv, "users_1_1", "sync_key").await.unwrap_err();
        assert!(matches!(err, KvError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn pfadd_ignores_duplicates() {
        let kv = MemoryStore::new();
        assert!(kv.pfadd("statistics_users_1", b"42").await.unwrap());
        assert!(!kv.pfadd("statistics_users_1", b"42").await.unwrap());
        assert!(kv.pfadd("statistics_users_1", b"43").await.unwrap());
        assert_eq!(kv.pfcount("statistics_users_1").await.unwrap(), 2);
        assert_eq!(kv.pfcount("statistics_users_2").await.unwrap(), 0);
    }
}
