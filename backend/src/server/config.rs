//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::web;
use parcel_tracker::inbound::http::state::HttpState;

/// Everything the HTTP server needs once dependencies are wired.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: web::Data<HttpState>,
}

impl ServerConfig {
    /// Construct a server configuration from a bind address and handler state.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            http_state: web::Data::new(http_state),
        }
    }
}
