//! Tracking code newtype shared by the cache key and upstream paths.
use thiserror::Error;

/// Opaque shipment identifier supplied by the caller.
///
/// The upstream service is the source of truth for validity, so the only
/// local check is that the code is not blank. The value is otherwise used
/// verbatim as the cache key and as an upstream path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingCode(String);

impl TrackingCode {
    /// Construct a tracking code after checking that it is not blank.
    ///
    /// # Examples
    /// ```
    /// use parcel_tracker::domain::TrackingCode;
    ///
    /// let code = TrackingCode::new("TBA123456789000").expect("valid code");
    /// assert_eq!(code.as_str(), "TBA123456789000");
    /// assert!(TrackingCode::new("  ").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`TrackingCodeValidationError::Empty`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackingCodeValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(TrackingCodeValidationError::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for TrackingCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`TrackingCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingCodeValidationError {
    /// Code is empty after trimming whitespace.
    #[error("tracking code must not be empty")]
    Empty,
}
