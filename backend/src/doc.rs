//! OpenAPI documentation for the tracking endpoint and health probes.
//!
//! Exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{HistoryEvent, TrackingRecord, TrackingSummary};
use crate::inbound::http::ErrorEnvelope;

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parcel tracker API",
        description = "Resolve carrier tracking codes into normalised shipment status."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::tracking::track,
        crate::inbound::http::tracking::track_missing,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(TrackingRecord, TrackingSummary, HistoryEvent, ErrorEnvelope)),
    tags(
        (name = "tracking", description = "Shipment status lookup"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
