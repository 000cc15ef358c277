//! Reqwest-backed upstream fetcher.
//!
//! This adapter owns transport details only: URL construction, outbound
//! identity, session headers, timeouts and transport error mapping. HTTP
//! statuses are reported, never interpreted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, Url};

use crate::domain::CSRF_HEADER;
use crate::domain::ports::{
    UpstreamEndpoint, UpstreamFetchError, UpstreamFetcher, UpstreamMethod, UpstreamRequest,
    UpstreamResponse,
};

/// Browser user agent presented to the upstream service by default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT_LANGUAGE: &str = "it-IT,it;q=0.9,en;q=0.8";

/// Outbound identity headers sent on every upstream call.
#[derive(Debug, Clone)]
pub struct UpstreamHttpIdentity {
    /// HTTP user-agent sent upstream.
    pub user_agent: String,
    /// Accept-Language header; selects the language of translated statuses.
    pub accept_language: String,
}

impl Default for UpstreamHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_owned(),
        }
    }
}

/// Fetcher issuing calls against one upstream origin.
///
/// Redirects are not followed: session cookies arrive on the first response
/// and a redirect target would not see the CSRF header.
pub struct ReqwestUpstreamFetcher {
    client: Client,
    base_url: Url,
    identity: UpstreamHttpIdentity,
}

impl ReqwestUpstreamFetcher {
    /// Build a fetcher with the default browser identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(base_url, timeout, UpstreamHttpIdentity::default())
    }

    /// Build a fetcher with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        base_url: Url,
        timeout: Duration,
        identity: UpstreamHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            base_url,
            identity,
        })
    }

    fn endpoint_url(&self, endpoint: &UpstreamEndpoint) -> Result<Url, UpstreamFetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                UpstreamFetchError::transport(format!(
                    "base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(endpoint.path_segments());
        Ok(url)
    }
}

#[async_trait]
impl UpstreamFetcher for ReqwestUpstreamFetcher {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, UpstreamFetchError> {
        let url = self.endpoint_url(&request.endpoint)?;
        let mut builder = match request.method {
            UpstreamMethod::Get => self.client.get(url),
            UpstreamMethod::Head => self.client.head(url),
            UpstreamMethod::Post => self.client.post(url),
        }
        .header(USER_AGENT, self.identity.user_agent.as_str())
        .header(ACCEPT_LANGUAGE, self.identity.accept_language.as_str());

        if let Some(token) = &request.csrf_token {
            builder = builder.header(CSRF_HEADER, token.as_str());
        }
        if !request.cookie_header.is_empty() {
            builder = builder.header(COOKIE, request.cookie_header.as_str());
        }
        if let Some(body) = &request.json_body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.map_err(map_transport_error)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> UpstreamFetchError {
    if error.is_timeout() {
        UpstreamFetchError::timeout(error.to_string())
    } else {
        UpstreamFetchError::transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Adapter behaviour against a local mock server.

    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::{CsrfToken, TrackingCode};

    fn code(value: &str) -> TrackingCode {
        TrackingCode::new(value).expect("valid code")
    }

    fn fetcher_for(server: &MockServer) -> ReqwestUpstreamFetcher {
        let base = Url::parse(&server.uri()).expect("mock server URI parses");
        ReqwestUpstreamFetcher::new(base, Duration::from_secs(2)).expect("client builds")
    }

    #[tokio::test]
    async fn unauthenticated_get_sends_identity_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tracking/TBA1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let request = UpstreamRequest::new(
            UpstreamMethod::Get,
            UpstreamEndpoint::TrackingPage(code("TBA1")),
        );
        let response = fetcher_for(&server)
            .send(&request)
            .await
            .expect("call succeeds");

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<html></html>");
        let received = server.received_requests().await.expect("recording enabled");
        let sent = received.first().expect("one request");
        assert_eq!(
            sent.headers.get("user-agent").and_then(|v| v.to_str().ok()),
            Some(DEFAULT_USER_AGENT)
        );
        assert!(sent.headers.get(CSRF_HEADER).is_none());
        assert!(sent.headers.get("cookie").is_none());
    }

    #[tokio::test]
    async fn session_headers_and_repeated_cookies_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/tracking/TBA1"))
            .and(header(CSRF_HEADER, "tok-1"))
            .and(header("cookie", "session-id=1; ubid-acbit=2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("set-cookie", "session-token=abc; Path=/")
                    .append_header("set-cookie", "session-id-time=99"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = UpstreamRequest::new(
            UpstreamMethod::Head,
            UpstreamEndpoint::TrackingPage(code("TBA1")),
        )
        .with_session(
            CsrfToken::new("tok-1").expect("token"),
            "session-id=1; ubid-acbit=2".to_owned(),
        );
        let response = fetcher_for(&server)
            .send(&request)
            .await
            .expect("call succeeds");

        let cookies: Vec<_> = response
            .headers
            .iter()
            .filter(|(name, _)| name == "set-cookie")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(
            cookies,
            ["session-token=abc; Path=/", "session-id-time=99"]
        );
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getLocalizedStrings"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"localizationKeys": ["a", "b"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": "A"})))
            .expect(1)
            .mount(&server)
            .await;

        let request = UpstreamRequest::new(UpstreamMethod::Post, UpstreamEndpoint::LocalizedStrings)
            .with_json(json!({"localizationKeys": ["a", "b"]}));
        let response = fetcher_for(&server)
            .send(&request)
            .await
            .expect("call succeeds");

        assert_eq!(response.body, r#"{"a":"A"}"#);
    }

    #[rstest]
    #[case::not_found(404)]
    #[case::server_error(503)]
    #[case::redirect(302)]
    #[tokio::test]
    async fn non_success_statuses_are_responses(#[case] status: u16) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(status)
                    .insert_header("location", "/elsewhere")
                    .set_body_string("upstream says no"),
            )
            .mount(&server)
            .await;

        let request = UpstreamRequest::new(
            UpstreamMethod::Get,
            UpstreamEndpoint::TrackerApi(code("TBA1")),
        );
        let response = fetcher_for(&server)
            .send(&request)
            .await
            .expect("status is not a transport failure");

        assert_eq!(response.status, status);
        assert_eq!(response.body, "upstream says no");
    }

    #[tokio::test]
    async fn tracking_code_is_encoded_as_one_segment_under_base_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proxy/api/tracker/A%2FB%20C"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/proxy/", server.uri())).expect("base parses");
        let fetcher =
            ReqwestUpstreamFetcher::new(base, Duration::from_secs(2)).expect("client builds");
        let request = UpstreamRequest::new(
            UpstreamMethod::Get,
            UpstreamEndpoint::TrackerApi(code("A/B C")),
        );

        fetcher.send(&request).await.expect("call succeeds");
    }

    #[tokio::test]
    async fn slow_upstream_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let base = Url::parse(&server.uri()).expect("mock server URI parses");
        let fetcher =
            ReqwestUpstreamFetcher::new(base, Duration::from_millis(50)).expect("client builds");
        let request = UpstreamRequest::new(
            UpstreamMethod::Get,
            UpstreamEndpoint::TrackerApi(code("TBA1")),
        );
        let error = fetcher.send(&request).await.expect_err("call times out");

        assert!(matches!(error, UpstreamFetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_transport() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let port = listener.local_addr().expect("local address").port();
        drop(listener);
        let base = Url::parse(&format!("http://127.0.0.1:{port}/")).expect("URL parses");

        let fetcher = ReqwestUpstreamFetcher::new(base, Duration::from_secs(2)).expect("client builds");
        let request = UpstreamRequest::new(
            UpstreamMethod::Get,
            UpstreamEndpoint::TrackingPage(code("TBA1")),
        );
        let error = fetcher.send(&request).await.expect_err("nothing listens");

        assert!(matches!(error, UpstreamFetchError::Transport { .. }));
    }

    #[test]
    fn opaque_base_url_is_rejected_per_call() {
        let base = Url::parse("mailto:ops@example.com").expect("URL parses");
        let fetcher = ReqwestUpstreamFetcher::new(base, Duration::from_secs(1)).expect("client builds");

        let error = fetcher
            .endpoint_url(&UpstreamEndpoint::LocalizedStrings)
            .expect_err("cannot-be-a-base URL");
        assert!(matches!(error, UpstreamFetchError::Transport { .. }));
    }
}
