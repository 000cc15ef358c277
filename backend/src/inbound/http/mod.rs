//! HTTP inbound adapter exposing the tracking endpoint and health probes.
//!
//! ```text
//! GET /{tracking_code}   resolve one tracking code
//! GET /                  missing code, always 400
//! GET /health/live       liveness probe
//! GET /health/ready      readiness probe
//! *                      any other path, 404 envelope
//! ```

pub mod error;
pub mod health;
pub mod state;
pub mod tracking;

pub use error::{ApiResult, ErrorEnvelope, route_not_found};
