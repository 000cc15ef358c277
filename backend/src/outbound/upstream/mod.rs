//! Upstream tracking service adapters.
//!
//! This module provides the reqwest implementation of the `UpstreamFetcher`
//! port.

mod http_fetcher;

pub use http_fetcher::{ReqwestUpstreamFetcher, UpstreamHttpIdentity};
