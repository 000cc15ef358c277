//! Dependency construction for the tracking pipeline.

use std::io;
use std::sync::Arc;

use parcel_tracker::config::TrackerSettings;
use parcel_tracker::domain::TrackingService;
use parcel_tracker::domain::ports::{TrackingResultCache, UpstreamFetcher};
use parcel_tracker::inbound::http::state::HttpState;
use parcel_tracker::outbound::cache::{InMemoryTrackingCache, RedisTrackingCache};
use parcel_tracker::outbound::upstream::ReqwestUpstreamFetcher;
use tracing::info;

/// Select the result cache: the cache server when configured, otherwise the
/// in-process map.
fn build_cache(settings: &TrackerSettings) -> io::Result<Arc<dyn TrackingResultCache>> {
    match settings.cache_server() {
        Some(config) => {
            info!(url = %config.url(), "using cache server for tracking results");
            let cache = RedisTrackingCache::connect_lazy(&config)
                .map_err(|err| io::Error::other(format!("cache configuration failed: {err}")))?;
            Ok(Arc::new(cache))
        }
        None => {
            info!("no cache server configured; using in-process cache");
            Ok(Arc::new(InMemoryTrackingCache::new(Arc::new(
                mockable::DefaultClock,
            ))))
        }
    }
}

fn build_fetcher(settings: &TrackerSettings) -> io::Result<Arc<dyn UpstreamFetcher>> {
    let base_url = settings.upstream_base_url()?;
    info!(%base_url, "upstream tracking service configured");
    let fetcher = ReqwestUpstreamFetcher::with_identity(
        base_url,
        settings.request_timeout()?,
        settings.http_identity(),
    )
    .map_err(|err| io::Error::other(format!("failed to build upstream client: {err}")))?;
    Ok(Arc::new(fetcher))
}

/// Build handler state from validated settings.
///
/// # Errors
///
/// Propagates configuration errors and HTTP client construction failures.
pub(crate) fn build_http_state(settings: &TrackerSettings) -> io::Result<HttpState> {
    let service = TrackingService::new(
        build_fetcher(settings)?,
        build_cache(settings)?,
        settings.tracking_service_config()?,
    );
    Ok(HttpState::new(Arc::new(service)))
}
