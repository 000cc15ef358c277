//! Driving port for the "resolve tracking code" use-case.
use async_trait::async_trait;

use crate::domain::{TrackingError, TrackingRecord};

/// Resolve the current shipment status for a caller-supplied tracking code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingQuery: Send + Sync {
    /// Resolve `tracking_code` into a normalised record.
    ///
    /// The raw code is accepted so that blank input is reported as
    /// [`TrackingError::InvalidInput`] by the implementation.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] for every fatal pipeline failure.
    async fn resolve(&self, tracking_code: &str) -> Result<TrackingRecord, TrackingError>;
}
