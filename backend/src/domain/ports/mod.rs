//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod tracking_query;
mod tracking_result_cache;
mod upstream_fetcher;

#[cfg(test)]
pub use tracking_query::MockTrackingQuery;
pub use tracking_query::TrackingQuery;
#[cfg(test)]
pub use tracking_result_cache::MockTrackingResultCache;
pub use tracking_result_cache::{ResultCacheError, TrackingResultCache};
#[cfg(test)]
pub use upstream_fetcher::MockUpstreamFetcher;
pub use upstream_fetcher::{
    UpstreamEndpoint, UpstreamFetchError, UpstreamFetcher, UpstreamMethod, UpstreamRequest,
    UpstreamResponse,
};
