//! Tracking endpoint.
//!
//! The tracking code is the whole path segment. Success returns the
//! normalised record; every failure returns the error envelope.

use actix_web::{get, web};

use crate::domain::TrackingRecord;
use crate::inbound::http::{ApiResult, ErrorEnvelope};
use crate::inbound::http::state::HttpState;

/// Resolve the current shipment status for a tracking code.
#[utoipa::path(
    get,
    path = "/{tracking_code}",
    params(("tracking_code" = String, Path, description = "Carrier tracking code")),
    responses(
        (status = 200, description = "Normalised tracking record", body = TrackingRecord),
        (status = 400, description = "Missing tracking code", body = ErrorEnvelope),
        (status = 404, description = "Upstream does not know the code", body = ErrorEnvelope),
        (status = 500, description = "Upstream negotiation or decoding failed", body = ErrorEnvelope)
    ),
    tags = ["tracking"],
    operation_id = "trackParcel"
)]
#[get("/{tracking_code}")]
pub async fn track(
    state: web::Data<HttpState>,
    tracking_code: web::Path<String>,
) -> ApiResult<web::Json<TrackingRecord>> {
    let record = state.tracking.resolve(&tracking_code).await?;
    Ok(web::Json(record))
}

/// Reject requests that carry no tracking code.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 400, description = "Missing tracking code", body = ErrorEnvelope)
    ),
    tags = ["tracking"],
    operation_id = "trackParcelMissingCode"
)]
#[get("/")]
pub async fn track_missing(state: web::Data<HttpState>) -> ApiResult<web::Json<TrackingRecord>> {
    let record = state.tracking.resolve("").await?;
    Ok(web::Json(record))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::MockTrackingQuery;
    use crate::domain::{TrackingError, TrackingSummary};

    fn record() -> TrackingRecord {
        TrackingRecord {
            tracking_code: "TBA1".to_owned(),
            summary: TrackingSummary {
                shipper_name: Some("Libreria Rossi".to_owned()),
                carrier: Some("Poste Italiane".to_owned()),
                expected_delivery_date: Some("2026-10-20".to_owned()),
            },
            history: Vec::new(),
        }
    }

    async fn call(query: MockTrackingQuery, uri: &str) -> (StatusCode, Value) {
        let state = web::Data::new(HttpState::new(Arc::new(query)));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(track_missing)
                .service(track),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn returns_record_as_camel_case_json() {
        let mut query = MockTrackingQuery::new();
        query
            .expect_resolve()
            .with(eq("TBA1"))
            .times(1)
            .return_once(|_| Ok(record()));

        let (status, body) = call(query, "/TBA1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "trackingCode": "TBA1",
                "summary": {
                    "shipperName": "Libreria Rossi",
                    "carrier": "Poste Italiane",
                    "expectedDeliveryDate": "2026-10-20"
                },
                "history": []
            })
        );
    }

    #[actix_web::test]
    async fn path_segment_is_percent_decoded() {
        let mut query = MockTrackingQuery::new();
        query
            .expect_resolve()
            .with(eq("TBA 1"))
            .times(1)
            .return_once(|_| Err(TrackingError::upstream_not_found("Tracking ID not valid")));

        let (status, body) = call(query, "/TBA%201").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"type": "error", "code": 404, "message": "Tracking ID not valid"})
        );
    }

    #[rstest]
    #[case::csrf(TrackingError::missing_csrf_token(), 500)]
    #[case::transport(TrackingError::transport("connection reset"), 500)]
    #[actix_web::test]
    async fn failures_use_the_envelope(#[case] error: TrackingError, #[case] code: u16) {
        let message = error.to_string();
        let mut query = MockTrackingQuery::new();
        query.expect_resolve().return_once(move |_| Err(error));

        let (status, body) = call(query, "/TBA1").await;

        assert_eq!(status.as_u16(), code);
        assert_eq!(body, json!({"type": "error", "code": code, "message": message}));
    }

    #[actix_web::test]
    async fn root_reports_missing_code() {
        let mut query = MockTrackingQuery::new();
        query
            .expect_resolve()
            .with(eq(""))
            .times(1)
            .return_once(|_| Err(TrackingError::missing_tracking_code()));

        let (status, body) = call(query, "/").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"type": "error", "code": 400, "message": "You must provide a tracking id"})
        );
    }
}
