//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **upstream**: reqwest client for the third-party tracking service
//! - **cache**: cache-server and in-process result caches
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod cache;
pub mod upstream;
