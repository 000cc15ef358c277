//! CSRF token extraction from the upstream tracking page.

use std::sync::LazyLock;

use regex::Regex;

/// Request header carrying the CSRF token on authenticated upstream calls.
pub const CSRF_HEADER: &str = "anti-csrftoken-a2z";

#[expect(
    clippy::expect_used,
    reason = "literal pattern is exercised by the unit tests below"
)]
static CSRF_META_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+name="CSRF-TOKEN"\s+content="([^"]+)""#)
        .expect("CSRF meta tag pattern compiles")
});

/// Per-session secret echoed back on every authenticated upstream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Wrap a raw token, rejecting blank values.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let raw = value.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Find the token in the `CSRF-TOKEN` meta tag of an HTML page.
    ///
    /// # Examples
    /// ```
    /// use parcel_tracker::domain::CsrfToken;
    ///
    /// let page = r#"<head><meta name="CSRF-TOKEN" content="hJk2=="></head>"#;
    /// let token = CsrfToken::extract(page).expect("token present");
    /// assert_eq!(token.as_str(), "hJk2==");
    /// ```
    #[must_use]
    pub fn extract(page: &str) -> Option<Self> {
        CSRF_META_TAG
            .captures(page)
            .and_then(|captures| captures.get(1))
            .and_then(|value| Self::new(value.as_str()))
    }

    /// Borrow the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
