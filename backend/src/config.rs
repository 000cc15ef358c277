//! Service configuration loaded via OrthoConfig.
//!
//! Every option may be supplied as a CLI flag, a `TRACKER_*` environment
//! variable or a configuration file entry. Unset options fall back to the
//! defaults exposed by the accessors below; values that cannot work are
//! rejected at start-up with an [`std::io::Error`].

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::session::DEFAULT_MAX_COOKIE_ROUNDS;
use crate::domain::tracking_service::DEFAULT_CACHE_TTL;
use crate::domain::{NegotiationPolicy, TrackingServiceConfig};
use crate::outbound::cache::RedisCacheConfig;
use crate::outbound::upstream::UpstreamHttpIdentity;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPSTREAM_BASE_URL: &str = "https://track.amazon.it";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CACHE_PORT: u16 = 6379;

/// Configuration values for the tracking service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRACKER")]
pub struct TrackerSettings {
    /// HTTP listen address.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// Origin of the upstream tracking service.
    pub upstream_base_url: Option<String>,
    /// Timeout applied to each upstream call, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// User agent presented upstream.
    pub user_agent: Option<String>,
    /// Accept-Language presented upstream.
    pub accept_language: Option<String>,
    /// Cache server host; the in-process cache is used when unset.
    pub cache_host: Option<String>,
    /// Cache server port.
    pub cache_port: Option<u16>,
    /// Lifetime of cached tracking records, in seconds.
    pub cache_ttl_secs: Option<u64>,
    /// Cap on cookie-filling rounds after the token fetch.
    pub max_cookie_rounds: Option<u32>,
    /// Pause between cookie-filling rounds, in milliseconds.
    pub cookie_round_delay_ms: Option<u64>,
}

impl TrackerSettings {
    /// Socket address the HTTP server binds to.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] when the address does not parse.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let raw = self.bind_addr.as_str();
        raw.parse()
            .map_err(|err| invalid(format!("invalid bind_addr {raw:?}: {err}")))
    }

    /// Upstream tracking service origin.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] when the URL does not parse or
    /// cannot carry a path.
    pub fn upstream_base_url(&self) -> io::Result<Url> {
        let raw = self
            .upstream_base_url
            .as_deref()
            .unwrap_or(DEFAULT_UPSTREAM_BASE_URL);
        let url =
            Url::parse(raw).map_err(|err| invalid(format!("invalid upstream_base_url {raw:?}: {err}")))?;
        if url.cannot_be_a_base() {
            return Err(invalid(format!(
                "upstream_base_url {raw:?} must be a hierarchical URL"
            )));
        }
        Ok(url)
    }

    /// Per-call upstream timeout.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] for a zero timeout.
    pub fn request_timeout(&self) -> io::Result<Duration> {
        let secs = self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        non_zero_secs(secs, "request_timeout_secs")
    }

    /// Outbound identity, defaulting to a desktop browser.
    #[must_use]
    pub fn http_identity(&self) -> UpstreamHttpIdentity {
        let mut identity = UpstreamHttpIdentity::default();
        if let Some(user_agent) = &self.user_agent {
            identity.user_agent.clone_from(user_agent);
        }
        if let Some(accept_language) = &self.accept_language {
            identity.accept_language.clone_from(accept_language);
        }
        identity
    }

    /// Cache server settings, when a host is configured.
    #[must_use]
    pub fn cache_server(&self) -> Option<RedisCacheConfig> {
        self.cache_host
            .as_deref()
            .filter(|host| !host.trim().is_empty())
            .map(|host| RedisCacheConfig::new(host, self.cache_port.unwrap_or(DEFAULT_CACHE_PORT)))
    }

    /// Tracking pipeline tunables.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] for a zero cache TTL or a
    /// round cap above [`DEFAULT_MAX_COOKIE_ROUNDS`].
    pub fn tracking_service_config(&self) -> io::Result<TrackingServiceConfig> {
        let cache_ttl = match self.cache_ttl_secs {
            Some(secs) => non_zero_secs(secs, "cache_ttl_secs")?,
            None => DEFAULT_CACHE_TTL,
        };
        let max_cookie_rounds = self.max_cookie_rounds.unwrap_or(DEFAULT_MAX_COOKIE_ROUNDS);
        if max_cookie_rounds > DEFAULT_MAX_COOKIE_ROUNDS {
            return Err(invalid(format!(
                "max_cookie_rounds must not exceed {DEFAULT_MAX_COOKIE_ROUNDS}, got {max_cookie_rounds}"
            )));
        }
        Ok(TrackingServiceConfig {
            cache_ttl,
            negotiation: NegotiationPolicy {
                max_cookie_rounds,
                round_delay: Duration::from_millis(self.cookie_round_delay_ms.unwrap_or(0)),
            },
        })
    }
}

fn non_zero_secs(secs: u64, field: &str) -> io::Result<Duration> {
    if secs == 0 {
        return Err(invalid(format!("{field} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}
