//! Port interface for caching resolved tracking records.
use std::time::Duration;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{TrackingCode, TrackingRecord};

define_port_error! {
    /// Errors surfaced by cache adapters.
    pub enum ResultCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "tracking cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "tracking cache serialisation failed: {message}",
    }
}

/// Short-lived store of resolved records keyed by tracking code.
///
/// Implementations must tolerate concurrent `get`/`set` calls without extra
/// locking from callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingResultCache: Send + Sync {
    /// Read the record cached for `code`, if it has not expired.
    async fn get(&self, code: &TrackingCode) -> Result<Option<TrackingRecord>, ResultCacheError>;

    /// Store `record` for `code`, expiring after `ttl`.
    async fn set(
        &self,
        code: &TrackingCode,
        record: &TrackingRecord,
        ttl: Duration,
    ) -> Result<(), ResultCacheError>;
}
