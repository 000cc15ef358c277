//! Domain-level error types for tracking resolution.
//!
//! These errors are transport agnostic. The inbound HTTP adapter maps them to
//! the `{type, code, message}` envelope and a mirrored status code.

use serde::{Deserialize, Serialize};

use super::ports::{UpstreamFetchError, define_port_error};

/// Message returned when the caller supplies no tracking code.
pub const MISSING_TRACKING_CODE_MESSAGE: &str = "You must provide a tracking id";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The upstream service does not know the tracking code.
    NotFound,
    /// Any other failure inside the pipeline.
    InternalError,
}

define_port_error! {
    /// Failures raised while resolving one tracking code.
    ///
    /// `TranslationUnavailable` is produced by the resolver's enrichment step
    /// and absorbed there; it never reaches callers of the tracking query.
    pub enum TrackingError {
        /// The caller supplied an empty tracking code.
        InvalidInput { message: String } => "{message}",
        /// The tracking page carried no CSRF meta tag.
        MissingCsrfToken => "Unable to retrieve a valid CSRF token",
        /// A call without fallback failed at the connection level.
        Transport { message: String } => "{message}",
        /// A required upstream JSON document could not be decoded.
        MalformedUpstreamResponse { message: String } => "{message}",
        /// The upstream service reported an error for the tracking code.
        UpstreamNotFound { message: String } => "{message}",
        /// Localised status strings could not be fetched or decoded.
        TranslationUnavailable { message: String } => "translation unavailable: {message}",
    }
}

impl TrackingError {
    /// Error returned for a missing or blank tracking code.
    ///
    /// # Examples
    /// ```
    /// use parcel_tracker::domain::{ErrorCode, TrackingError};
    ///
    /// let err = TrackingError::missing_tracking_code();
    /// assert_eq!(err.code(), ErrorCode::InvalidRequest);
    /// assert_eq!(err.to_string(), "You must provide a tracking id");
    /// ```
    #[must_use]
    pub fn missing_tracking_code() -> Self {
        Self::invalid_input(MISSING_TRACKING_CODE_MESSAGE)
    }

    /// Stable machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidRequest,
            Self::UpstreamNotFound { .. } => ErrorCode::NotFound,
            Self::MissingCsrfToken
            | Self::Transport { .. }
            | Self::MalformedUpstreamResponse { .. }
            | Self::TranslationUnavailable { .. } => ErrorCode::InternalError,
        }
    }
}

impl From<UpstreamFetchError> for TrackingError {
    fn from(value: UpstreamFetchError) -> Self {
        Self::transport(value.to_string())
    }
}
