//! Normalised shipment status returned to callers and held in the cache.
//!
//! The serde representation is the wire contract: the inbound adapter returns
//! it verbatim and cache adapters persist exactly this JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Normalised tracking result for one tracking code.
///
/// # Examples
/// ```
/// use parcel_tracker::domain::{TrackingRecord, TrackingSummary};
///
/// let record = TrackingRecord {
///     tracking_code: "TBA123".to_owned(),
///     summary: TrackingSummary::default(),
///     history: Vec::new(),
/// };
/// let json = serde_json::to_value(&record).expect("serialises");
/// assert_eq!(json["trackingCode"], "TBA123");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRecord {
    /// Tracking code exactly as supplied by the caller.
    #[serde(alias = "trackingID")]
    #[schema(example = "TBA302811111")]
    pub tracking_code: String,
    /// Shipment-level summary.
    pub summary: TrackingSummary,
    /// Tracking events in upstream order.
    pub history: Vec<HistoryEvent>,
}

/// Shipment-level metadata taken from the upstream progress tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSummary {
    /// Merchant or sender name.
    pub shipper_name: Option<String>,
    /// Carrier handling the final leg.
    pub carrier: Option<String>,
    /// Delivery estimate as reported upstream.
    pub expected_delivery_date: Option<String>,
}

/// One tracking event with its status resolved to display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEvent {
    /// Upstream event code, for example `Delivered`.
    pub code: String,
    /// Translated status, or empty when no translation was available.
    pub status: String,
    /// Upstream location object, passed through untouched.
    #[schema(value_type = Object)]
    pub location: Value,
    /// Event timestamp as reported upstream.
    pub time: String,
}
