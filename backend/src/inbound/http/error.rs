//! HTTP adapter mapping for domain errors.
//!
//! Every failure is rendered as the same JSON envelope,
//! `{"type":"error","code":<status>,"message":<text>}`, with the HTTP status
//! mirroring `code`.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ErrorCode, TrackingError};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, TrackingError>;

/// Discriminator value carried by every error body.
pub const ERROR_ENVELOPE_TYPE: &str = "error";

/// JSON body returned for every failed request.
///
/// # Examples
/// ```
/// use parcel_tracker::domain::TrackingError;
/// use parcel_tracker::inbound::http::ErrorEnvelope;
///
/// let envelope = ErrorEnvelope::from(&TrackingError::missing_tracking_code());
/// let json = serde_json::to_value(&envelope).expect("serialises");
/// assert_eq!(json["type"], "error");
/// assert_eq!(json["code"], 400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Always `"error"`.
    #[serde(rename = "type")]
    #[schema(example = "error")]
    pub kind: String,
    /// HTTP status code of the response.
    #[schema(example = 404)]
    pub code: u16,
    /// Human-readable failure description.
    pub message: String,
}

impl ErrorEnvelope {
    /// Envelope for `status` carrying `message`.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            kind: ERROR_ENVELOPE_TYPE.to_owned(),
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

impl From<&TrackingError> for ErrorEnvelope {
    fn from(error: &TrackingError) -> Self {
        Self::new(status_for(error.code()), error.to_string())
    }
}

/// Fallback for requests no route matches, such as multi-segment paths.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    let envelope = ErrorEnvelope::new(
        StatusCode::NOT_FOUND,
        format!("No route for {} {}", req.method(), req.path()),
    );
    HttpResponse::NotFound().json(envelope)
}

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for TrackingError {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorEnvelope::from(self))
    }
}
