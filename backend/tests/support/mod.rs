//! Shared helpers for pipeline integration tests.
//!
//! Each test starts a local mock of the upstream tracking site and wires a
//! real `TrackingService` against it: reqwest fetcher plus in-process cache.

use std::sync::Arc;
use std::time::Duration;

use parcel_tracker::domain::{TrackingService, TrackingServiceConfig};
use parcel_tracker::outbound::cache::InMemoryTrackingCache;
use parcel_tracker::outbound::upstream::ReqwestUpstreamFetcher;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Tracking code used by the scenarios.
pub const CODE: &str = "TBA302811111";

/// Every cookie the upstream must issue for a complete session.
pub const ALL_COOKIES: [&str; 4] = [
    "session-id=262-1234567-7654321; Path=/",
    "session-id-time=2082787201l; Path=/",
    "session-token=\"abc+def==\"; Path=/; Secure",
    "ubid-acbit=261-7654321-1234567; Path=/",
];

/// Build a service pointed at `server`.
pub fn service_for(server: &MockServer) -> TrackingService {
    let base = Url::parse(&server.uri()).expect("mock server URI parses");
    let fetcher =
        ReqwestUpstreamFetcher::new(base, Duration::from_secs(5)).expect("client builds");
    let cache = InMemoryTrackingCache::new(Arc::new(mockable::DefaultClock));
    TrackingService::new(
        Arc::new(fetcher),
        Arc::new(cache),
        TrackingServiceConfig::default(),
    )
}

/// Mount the tracking page answering with a CSRF token and `cookies`.
pub async fn mount_token_page(server: &MockServer, cookies: &[&str], expected_calls: u64) {
    let mut template = ResponseTemplate::new(200).set_body_string(
        r#"<html><head><meta name="CSRF-TOKEN" content="hfZ9+tok/en="></head><body></body></html>"#,
    );
    for cookie in cookies {
        template = template.append_header("set-cookie", *cookie);
    }
    Mock::given(method("GET"))
        .and(path(format!("/tracking/{CODE}")))
        .respond_with(template)
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mount the cookie-round endpoint answering with `cookies`.
pub async fn mount_cookie_rounds(server: &MockServer, cookies: &[&str], expected_calls: u64) {
    let mut template = ResponseTemplate::new(200);
    for cookie in cookies {
        template = template.append_header("set-cookie", *cookie);
    }
    Mock::given(method("HEAD"))
        .and(path(format!("/tracking/{CODE}")))
        .respond_with(template)
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mount the tracker API returning the given embedded documents.
pub async fn mount_tracker(
    server: &MockServer,
    progress: &Value,
    history: &Value,
    expected_calls: u64,
) {
    let body = json!({
        "progressTracker": progress.to_string(),
        "eventHistory": history.to_string(),
    });
    Mock::given(method("GET"))
        .and(path(format!("/api/tracker/{CODE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mount the translation endpoint.
pub async fn mount_translations(server: &MockServer, response: ResponseTemplate, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/getLocalizedStrings"))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Progress tracker with a full summary and no errors.
pub fn delivered_progress() -> Value {
    json!({
        "summary": {
            "metadata": {
                "shipperName": {"stringValue": "Libreria Rossi"},
                "lastLegCarrier": {"stringValue": "Poste Italiane"}
            }
        },
        "expectedDeliveryDate": "2026-10-20T18:00:00Z"
    })
}

/// History with two events referencing two localisation keys.
pub fn delivered_history() -> Value {
    json!({
        "eventHistory": [
            {
                "eventCode": "Delivered",
                "statusSummary": {"localisedStringId": "swa_rex_delivered"},
                "location": {"city": "Milano", "countryCode": "IT"},
                "eventTime": "2026-10-18T10:00:00Z"
            },
            {
                "eventCode": "Received",
                "statusSummary": {"localisedStringId": "swa_rex_arrived_at_sort_center"},
                "location": {"city": "Castel San Giovanni"},
                "eventTime": "2026-10-17T21:12:00Z"
            }
        ]
    })
}

/// Translations for [`delivered_history`].
pub fn delivered_translations() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "swa_rex_delivered": "Consegnato",
        "swa_rex_arrived_at_sort_center": "Arrivato al centro di smistamento"
    }))
}
