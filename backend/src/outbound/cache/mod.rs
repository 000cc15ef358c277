//! Result cache adapters implementing the `TrackingResultCache` port.
//!
//! Both adapters persist the record's JSON representation, so a cached
//! response is byte-identical to the freshly resolved one.
//!
//! - [`RedisTrackingCache`] stores entries on a cache server with `SET EX`.
//! - [`InMemoryTrackingCache`] keeps entries in process, expiring them
//!   against an injected clock.

mod memory;
mod redis;

pub use memory::InMemoryTrackingCache;
pub use redis::{RedisCacheConfig, RedisTrackingCache};
