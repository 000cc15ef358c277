//! Driven port for authenticated calls to the upstream tracking service.
//!
//! The domain describes which endpoint to hit and which session material to
//! attach; adapters own URLs, TLS, timeouts and header encoding.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{CsrfToken, TrackingCode};

/// HTTP method used for an upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMethod {
    /// Fetch a page or JSON document.
    Get,
    /// Fetch response headers only.
    Head,
    /// Submit a JSON body.
    Post,
}

/// Upstream endpoints used by the tracking pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamEndpoint {
    /// `/tracking/{code}`: HTML page carrying the CSRF token and cookies.
    TrackingPage(TrackingCode),
    /// `/api/tracker/{code}`: JSON tracking data.
    TrackerApi(TrackingCode),
    /// `/getLocalizedStrings`: batch translation of localisation keys.
    LocalizedStrings,
}

impl UpstreamEndpoint {
    /// Path segments relative to the service origin. The tracking code is a
    /// single segment, so adapters must percent-encode it as one.
    ///
    /// # Examples
    /// ```
    /// use parcel_tracker::domain::TrackingCode;
    /// use parcel_tracker::domain::ports::UpstreamEndpoint;
    ///
    /// let code = TrackingCode::new("TBA1").expect("valid code");
    /// let endpoint = UpstreamEndpoint::TrackerApi(code);
    /// assert_eq!(endpoint.path_segments(), vec!["api", "tracker", "TBA1"]);
    /// ```
    #[must_use]
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            Self::TrackingPage(code) => vec!["tracking", code.as_str()],
            Self::TrackerApi(code) => vec!["api", "tracker", code.as_str()],
            Self::LocalizedStrings => vec!["getLocalizedStrings"],
        }
    }
}

/// One upstream call described in domain terms.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    /// HTTP method.
    pub method: UpstreamMethod,
    /// Target endpoint.
    pub endpoint: UpstreamEndpoint,
    /// CSRF token sent in the `anti-csrftoken-a2z` header, when known.
    pub csrf_token: Option<CsrfToken>,
    /// Serialised cookie jar; omitted from the request when empty.
    pub cookie_header: String,
    /// JSON body for `POST` calls.
    pub json_body: Option<Value>,
}

impl UpstreamRequest {
    /// Unauthenticated request with no session material attached.
    #[must_use]
    pub const fn new(method: UpstreamMethod, endpoint: UpstreamEndpoint) -> Self {
        Self {
            method,
            endpoint,
            csrf_token: None,
            cookie_header: String::new(),
            json_body: None,
        }
    }

    /// Attach the session's CSRF token and serialised cookies.
    #[must_use]
    pub fn with_session(mut self, csrf_token: CsrfToken, cookie_header: String) -> Self {
        self.csrf_token = Some(csrf_token);
        self.cookie_header = cookie_header;
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }
}

/// Raw upstream response: status, headers in arrival order, and body text.
///
/// Non-2xx statuses are still responses; interpreting them is the caller's
/// job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Header name and value pairs; repeated headers appear once per value.
    pub headers: Vec<(String, String)>,
    /// Response body; empty for `HEAD` calls.
    pub body: String,
}

impl UpstreamResponse {
    /// Render the headers as `name: value` lines, one per header value.
    ///
    /// # Examples
    /// ```
    /// use parcel_tracker::domain::ports::UpstreamResponse;
    ///
    /// let response = UpstreamResponse {
    ///     status: 200,
    ///     headers: vec![("set-cookie".to_owned(), "a=1".to_owned())],
    ///     body: String::new(),
    /// };
    /// assert_eq!(response.header_text(), "set-cookie: a=1\r\n");
    /// ```
    #[must_use]
    pub fn header_text(&self) -> String {
        self.headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}\r\n"))
            .collect()
    }
}

define_port_error! {
    /// Connection-level failures talking to the upstream service.
    pub enum UpstreamFetchError {
        /// DNS, TLS, connection reset or an unusable request.
        Transport { message: String } => "upstream transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } => "upstream call timed out: {message}",
    }
}

/// Port issuing one HTTP call against the upstream tracking service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    /// Perform `request` and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamFetchError`] only for connection-level failures; any
    /// HTTP status is reported through [`UpstreamResponse::status`].
    async fn send(&self, request: &UpstreamRequest)
    -> Result<UpstreamResponse, UpstreamFetchError>;
}
