//! Redis-backed result cache.
//!
//! Entries are keyed by the raw tracking code and stored as JSON strings with
//! a server-side expiry.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::AsyncCommands;
use tracing::debug;

use crate::domain::ports::{ResultCacheError, TrackingResultCache};
use crate::domain::{TrackingCode, TrackingRecord};

/// Connection settings for the cache server.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use parcel_tracker::outbound::cache::RedisCacheConfig;
///
/// let config = RedisCacheConfig::new("cache.internal", 6380)
///     .with_connection_timeout(Duration::from_secs(1));
/// assert_eq!(config.url(), "redis://cache.internal:6380/");
/// ```
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    host: String,
    port: u16,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisCacheConfig {
    /// Create a configuration for `host:port`.
    ///
    /// Defaults: `max_size` 8 connections, `connection_timeout` 2 seconds.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            max_size: 8,
            connection_timeout: Duration::from_secs(2),
        }
    }

    /// Set the maximum number of pooled connections.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set how long a checkout may wait for a connection.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Connection URL understood by the redis client.
    #[must_use]
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

/// Result cache backed by a pooled cache-server connection.
#[derive(Clone)]
pub struct RedisTrackingCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisTrackingCache {
    /// Build a lazily connecting pool for `config`.
    ///
    /// No connection is attempted here; an unreachable server surfaces as
    /// [`ResultCacheError::Backend`] on first use, which callers absorb.
    ///
    /// # Errors
    ///
    /// Returns [`ResultCacheError::Backend`] when the connection URL is
    /// invalid.
    pub fn connect_lazy(config: &RedisCacheConfig) -> Result<Self, ResultCacheError> {
        let manager = RedisConnectionManager::new(config.url())
            .map_err(|err| ResultCacheError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build_unchecked(manager);
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, ResultCacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| ResultCacheError::backend(format!("checkout failed: {err}")))
    }
}

#[async_trait]
impl TrackingResultCache for RedisTrackingCache {
    async fn get(&self, code: &TrackingCode) -> Result<Option<TrackingRecord>, ResultCacheError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn
            .get(code.as_str())
            .await
            .map_err(|err| ResultCacheError::backend(err.to_string()))?;
        debug!(tracking_code = %code, hit = payload.is_some(), "cache lookup");
        payload
            .map(|json| decode_record(&json))
            .transpose()
    }

    async fn set(
        &self,
        code: &TrackingCode,
        record: &TrackingRecord,
        ttl: Duration,
    ) -> Result<(), ResultCacheError> {
        let payload = serde_json::to_string(record)
            .map_err(|err| ResultCacheError::serialization(err.to_string()))?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(code.as_str(), payload, expiry_seconds(ttl))
            .await
            .map_err(|err| ResultCacheError::backend(err.to_string()))
    }
}

fn decode_record(json: &str) -> Result<TrackingRecord, ResultCacheError> {
    serde_json::from_str(json).map_err(|err| ResultCacheError::serialization(err.to_string()))
}

/// `SET EX` rejects zero; sub-second TTLs round up to one second.
fn expiry_seconds(ttl: Duration) -> u64 {
    let seconds = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        seconds.saturating_add(1)
    } else {
        seconds.max(1)
    }
}
