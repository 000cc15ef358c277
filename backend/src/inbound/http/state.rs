//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the tracking driving port and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::TrackingQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Resolves tracking codes.
    pub tracking: Arc<dyn TrackingQuery>,
}

impl HttpState {
    /// Construct state from the tracking port implementation.
    ///
    /// # Examples
    /// ```ignore
    /// let state = HttpState::new(Arc::new(tracking_service));
    /// ```
    pub fn new(tracking: Arc<dyn TrackingQuery>) -> Self {
        Self { tracking }
    }
}
