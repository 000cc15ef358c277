//! Session negotiation against the upstream tracking page.
//!
//! The upstream service only serves tracking data and translations once the
//! caller presents a CSRF token and a set of session cookies, and it hands the
//! cookies out piecemeal: each request may yield another cookie needed by the
//! next. Negotiation is modelled as an explicit state machine:
//!
//! ```text
//! FetchingToken --token--> FillingCookies(0) --HEAD--> FillingCookies(n + 1)
//!       |                        |
//!   no token / transport     filled, cap reached or HEAD transport failure
//!       v                        v
//!     Failed                   Ready
//! ```
//!
//! Cookie rounds are best effort: running out of attempts or losing the
//! connection mid-negotiation still yields a session with whatever cookies
//! were gathered, because the tracker API may answer usefully regardless.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::cookie_jar::parse_set_cookies;
use super::ports::{UpstreamEndpoint, UpstreamFetcher, UpstreamMethod, UpstreamRequest};
use super::{CookieJar, CsrfToken, TrackingCode, TrackingError};

/// Default cap on cookie-filling `HEAD` requests after the token fetch.
pub const DEFAULT_MAX_COOKIE_ROUNDS: u32 = 5;

/// Tunables for cookie negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationPolicy {
    /// Maximum `HEAD` requests issued after the initial token fetch.
    pub max_cookie_rounds: u32,
    /// Pause inserted before every cookie round after the first.
    pub round_delay: Duration,
}

impl Default for NegotiationPolicy {
    fn default() -> Self {
        Self {
            max_cookie_rounds: DEFAULT_MAX_COOKIE_ROUNDS,
            round_delay: Duration::ZERO,
        }
    }
}

/// Authentication material for one resolution.
///
/// Created fresh for every tracking request and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    csrf_token: CsrfToken,
    cookies: CookieJar,
    cookie_rounds: u32,
}

impl Session {
    /// Assemble a session from negotiated parts.
    #[must_use]
    pub const fn new(csrf_token: CsrfToken, cookies: CookieJar, cookie_rounds: u32) -> Self {
        Self {
            csrf_token,
            cookies,
            cookie_rounds,
        }
    }

    /// Token echoed on every authenticated request.
    #[must_use]
    pub const fn csrf_token(&self) -> &CsrfToken {
        &self.csrf_token
    }

    /// Cookies gathered during negotiation; possibly incomplete.
    #[must_use]
    pub const fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Number of `HEAD` rounds issued while filling cookies.
    #[must_use]
    pub const fn cookie_rounds(&self) -> u32 {
        self.cookie_rounds
    }

    /// Build a request carrying this session's token and cookies.
    #[must_use]
    pub fn request(&self, method: UpstreamMethod, endpoint: UpstreamEndpoint) -> UpstreamRequest {
        UpstreamRequest::new(method, endpoint)
            .with_session(self.csrf_token.clone(), self.cookies.to_header_value())
    }
}

/// Negotiation state; each transition consumes the previous state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationState {
    /// Waiting for the tracking page that carries the CSRF token.
    FetchingToken,
    /// Token known; issuing `HEAD` rounds until the jar fills up.
    FillingCookies {
        /// Token extracted from the tracking page.
        token: CsrfToken,
        /// Cookies observed so far.
        jar: CookieJar,
        /// `HEAD` rounds already issued.
        attempt: u32,
    },
    /// Negotiation finished; the session may be partially filled.
    Ready(Session),
    /// Negotiation cannot continue.
    Failed(TrackingError),
}

/// Drives [`NegotiationState`] transitions against the upstream fetcher.
pub struct SessionNegotiator {
    fetcher: Arc<dyn UpstreamFetcher>,
    policy: NegotiationPolicy,
}

impl SessionNegotiator {
    /// Create a negotiator issuing calls through `fetcher`.
    pub fn new(fetcher: Arc<dyn UpstreamFetcher>, policy: NegotiationPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Run negotiation for `code` until it is ready or has failed.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Transport`] when the tracking page cannot be
    /// fetched and [`TrackingError::MissingCsrfToken`] when it carries no
    /// token. Cookie-round failures never surface here.
    pub async fn negotiate(&self, code: &TrackingCode) -> Result<Session, TrackingError> {
        let mut state = NegotiationState::FetchingToken;
        loop {
            state = match state {
                NegotiationState::Ready(session) => return Ok(session),
                NegotiationState::Failed(error) => return Err(error),
                pending => self.step(code, pending).await,
            };
        }
    }

    /// Perform the single transition out of `state`.
    pub async fn step(&self, code: &TrackingCode, state: NegotiationState) -> NegotiationState {
        match state {
            NegotiationState::FetchingToken => self.fetch_token(code).await,
            NegotiationState::FillingCookies {
                token,
                jar,
                attempt,
            } => self.fill_cookies(code, token, jar, attempt).await,
            terminal @ (NegotiationState::Ready(_) | NegotiationState::Failed(_)) => terminal,
        }
    }

    async fn fetch_token(&self, code: &TrackingCode) -> NegotiationState {
        let request = UpstreamRequest::new(
            UpstreamMethod::Get,
            UpstreamEndpoint::TrackingPage(code.clone()),
        );
        let response = match self.fetcher.send(&request).await {
            Ok(response) => response,
            Err(error) => return NegotiationState::Failed(error.into()),
        };

        let Some(token) = CsrfToken::extract(&response.body) else {
            debug!(tracking_code = %code, status = response.status, "tracking page has no CSRF token");
            return NegotiationState::Failed(TrackingError::missing_csrf_token());
        };

        let mut jar = CookieJar::session();
        jar.merge(&parse_set_cookies(&response.header_text()));
        debug!(
            tracking_code = %code,
            missing = ?jar.missing(),
            "CSRF token acquired"
        );
        NegotiationState::FillingCookies {
            token,
            jar,
            attempt: 0,
        }
    }

    async fn fill_cookies(
        &self,
        code: &TrackingCode,
        token: CsrfToken,
        mut jar: CookieJar,
        attempt: u32,
    ) -> NegotiationState {
        if jar.is_fully_filled() || attempt >= self.policy.max_cookie_rounds {
            debug!(
                tracking_code = %code,
                rounds = attempt,
                filled = jar.is_fully_filled(),
                "cookie negotiation finished"
            );
            return NegotiationState::Ready(Session::new(token, jar, attempt));
        }

        if attempt > 0 && !self.policy.round_delay.is_zero() {
            tokio::time::sleep(self.policy.round_delay).await;
        }

        let request = UpstreamRequest::new(
            UpstreamMethod::Head,
            UpstreamEndpoint::TrackingPage(code.clone()),
        )
        .with_session(token.clone(), jar.to_header_value());

        match self.fetcher.send(&request).await {
            Ok(response) => {
                jar.merge(&parse_set_cookies(&response.header_text()));
                debug!(
                    tracking_code = %code,
                    round = attempt + 1,
                    missing = ?jar.missing(),
                    "cookie round completed"
                );
                NegotiationState::FillingCookies {
                    token,
                    jar,
                    attempt: attempt + 1,
                }
            }
            Err(error) => {
                warn!(
                    tracking_code = %code,
                    round = attempt + 1,
                    error_kind = error.kind(),
                    %error,
                    "cookie round failed; continuing with partial cookies"
                );
                NegotiationState::Ready(Session::new(token, jar, attempt))
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
