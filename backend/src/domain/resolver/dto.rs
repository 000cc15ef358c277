//! Serde mirrors of the upstream tracker payloads.
//!
//! Every field is optional on the wire; absent or `null` values decode to
//! defaults and scalar fields accept any JSON scalar, so only genuinely
//! malformed JSON is rejected.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Render a scalar as text; `null` is absent, containers keep their JSON form.
pub(super) fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Top-level tracker API body. Both fields hold JSON documents encoded as
/// strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TrackerEnvelopeDto {
    pub(super) progress_tracker: String,
    pub(super) event_history: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct ProgressTrackerDto {
    #[serde(deserialize_with = "null_as_default")]
    pub(super) errors: Vec<UpstreamErrorDto>,
    pub(super) summary: Option<SummaryDto>,
    pub(super) expected_delivery_date: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct UpstreamErrorDto {
    pub(super) error_message: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct SummaryDto {
    pub(super) metadata: Option<SummaryMetadataDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct SummaryMetadataDto {
    pub(super) shipper_name: Option<StringValueDto>,
    pub(super) last_leg_carrier: Option<StringValueDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct StringValueDto {
    pub(super) string_value: Option<String>,
}

impl StringValueDto {
    pub(super) fn into_value(field: Option<Self>) -> Option<String> {
        field.and_then(|dto| dto.string_value)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct EventHistoryDto {
    #[serde(deserialize_with = "null_as_default")]
    pub(super) event_history: Vec<RawEventDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct RawEventDto {
    pub(super) event_code: Value,
    pub(super) status_summary: Option<StatusSummaryDto>,
    pub(super) location: Value,
    pub(super) event_time: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct StatusSummaryDto {
    pub(super) localised_string_id: Option<String>,
}
