//! In-process result cache used when no cache server is configured.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::ports::{ResultCacheError, TrackingResultCache};
use crate::domain::{TrackingCode, TrackingRecord};

#[derive(Debug, Clone)]
struct Entry {
    payload: String,
    expires_at: DateTime<Utc>,
}

/// Result cache holding JSON payloads in memory until their TTL lapses.
///
/// Expired entries are dropped on the next read of the same code and swept
/// from the whole map on every write.
pub struct InMemoryTrackingCache {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTrackingCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries held, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl TrackingResultCache for InMemoryTrackingCache {
    async fn get(&self, code: &TrackingCode) -> Result<Option<TrackingRecord>, ResultCacheError> {
        let now = self.clock.utc();
        let payload = {
            let entries = self.entries.read().await;
            match entries.get(code.as_str()) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => Some(entry.payload.clone()),
                Some(_) => None,
            }
        };

        let Some(payload) = payload else {
            let mut entries = self.entries.write().await;
            if entries
                .get(code.as_str())
                .is_some_and(|entry| entry.expires_at <= now)
            {
                entries.remove(code.as_str());
            }
            return Ok(None);
        };

        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|err| ResultCacheError::serialization(err.to_string()))
    }

    async fn set(
        &self,
        code: &TrackingCode,
        record: &TrackingRecord,
        ttl: Duration,
    ) -> Result<(), ResultCacheError> {
        let payload = serde_json::to_string(record)
            .map_err(|err| ResultCacheError::serialization(err.to_string()))?;
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|err| ResultCacheError::backend(format!("unrepresentable TTL: {err}")))?;
        let now = self.clock.utc();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| ResultCacheError::backend("TTL overflows the clock"))?;

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            code.as_str().to_owned(),
            Entry {
                payload,
                expires_at,
            },
        );
        Ok(())
    }
}
