//! Tracking service implementing the "resolve tracking code" driving port.
//!
//! Orchestrates validation, the result cache, session negotiation and data
//! resolution. Cache failures never fail a request: a failed read counts as
//! a miss and a failed write is logged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{TrackingQuery, TrackingResultCache, UpstreamFetcher};
use crate::domain::{
    NegotiationPolicy, SessionNegotiator, TrackingCode, TrackingError, TrackingRecord,
    TrackingResolver,
};

/// Default lifetime of a cached record.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Tunables for [`TrackingService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingServiceConfig {
    /// Lifetime of records stored in the result cache.
    pub cache_ttl: Duration,
    /// Cookie negotiation limits.
    pub negotiation: NegotiationPolicy,
}

impl Default for TrackingServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            negotiation: NegotiationPolicy::default(),
        }
    }
}

/// Resolves tracking codes through the cache and the upstream pipeline.
pub struct TrackingService {
    cache: Arc<dyn TrackingResultCache>,
    negotiator: SessionNegotiator,
    resolver: TrackingResolver,
    cache_ttl: Duration,
}

impl TrackingService {
    /// Wire the service to its driven ports.
    pub fn new(
        fetcher: Arc<dyn UpstreamFetcher>,
        cache: Arc<dyn TrackingResultCache>,
        config: TrackingServiceConfig,
    ) -> Self {
        Self {
            cache,
            negotiator: SessionNegotiator::new(Arc::clone(&fetcher), config.negotiation),
            resolver: TrackingResolver::new(fetcher),
            cache_ttl: config.cache_ttl,
        }
    }

    async fn cached(&self, code: &TrackingCode) -> Option<TrackingRecord> {
        match self.cache.get(code).await {
            Ok(hit) => hit,
            Err(err) => {
                warn!(tracking_code = %code, error_kind = err.kind(), error = %err, "cache read failed; treating as miss");
                None
            }
        }
    }

    async fn resolve_upstream(&self, code: &TrackingCode) -> Result<TrackingRecord, TrackingError> {
        let session = self.negotiator.negotiate(code).await?;
        self.resolver.resolve(code, &session).await
    }
}

#[async_trait]
impl TrackingQuery for TrackingService {
    async fn resolve(&self, tracking_code: &str) -> Result<TrackingRecord, TrackingError> {
        let code =
            TrackingCode::new(tracking_code).map_err(|_| TrackingError::missing_tracking_code())?;

        if let Some(record) = self.cached(&code).await {
            info!(tracking_code = %code, history = record.history.len(), cache = "hit", "tracking resolved");
            return Ok(record);
        }

        let record = self.resolve_upstream(&code).await.inspect_err(|err| {
            error!(tracking_code = %code, code = ?err.code(), error_kind = err.kind(), error = %err, "tracking resolution failed");
        })?;

        if let Err(err) = self.cache.set(&code, &record, self.cache_ttl).await {
            warn!(tracking_code = %code, error_kind = err.kind(), error = %err, "cache write failed");
        }
        info!(tracking_code = %code, history = record.history.len(), cache = "miss", "tracking resolved");
        Ok(record)
    }
}

#[cfg(test)]
#[path = "tracking_service_tests.rs"]
mod tests;
