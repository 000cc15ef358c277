//! Tracking data resolution for a negotiated session.
//!
//! Fetches the tracker API payload, unwraps its string-encoded documents,
//! enriches event statuses through the batch translation endpoint and
//! assembles the normalised [`TrackingRecord`].

mod dto;
mod localisation;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, warn};

use self::dto::{
    EventHistoryDto, ProgressTrackerDto, RawEventDto, StringValueDto, TrackerEnvelopeDto,
    scalar_text,
};
pub use self::localisation::{LocalizationMap, scan_localisation_keys};
use super::ports::{UpstreamEndpoint, UpstreamFetcher, UpstreamMethod};
use super::{HistoryEvent, Session, TrackingCode, TrackingError, TrackingRecord, TrackingSummary};

/// Message used when the upstream reports an error without any text.
const UNDESCRIBED_UPSTREAM_ERROR: &str = "Tracking code not found";

/// Resolves tracking records through an authenticated upstream session.
pub struct TrackingResolver {
    fetcher: Arc<dyn UpstreamFetcher>,
}

impl TrackingResolver {
    /// Create a resolver issuing calls through `fetcher`.
    pub fn new(fetcher: Arc<dyn UpstreamFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch and normalise the tracking data for `code`.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::Transport`] when the tracker API cannot be reached.
    /// - [`TrackingError::MalformedUpstreamResponse`] when the body or one of
    ///   its embedded documents is not valid JSON.
    /// - [`TrackingError::UpstreamNotFound`] carrying the first upstream error
    ///   message when the progress tracker reports errors.
    ///
    /// Translation failures are absorbed: statuses render empty instead.
    pub async fn resolve(
        &self,
        code: &TrackingCode,
        session: &Session,
    ) -> Result<TrackingRecord, TrackingError> {
        let request = session.request(
            UpstreamMethod::Get,
            UpstreamEndpoint::TrackerApi(code.clone()),
        );
        let response = self.fetcher.send(&request).await?;

        let envelope: TrackerEnvelopeDto = serde_json::from_str(&response.body).map_err(|e| {
            TrackingError::malformed_upstream_response(format!(
                "Unable to decode trackingData JSON: {e}"
            ))
        })?;
        let progress: ProgressTrackerDto = serde_json::from_str(&envelope.progress_tracker)
            .map_err(|e| {
                TrackingError::malformed_upstream_response(format!(
                    "Unable to decode progressTracker JSON: {e}"
                ))
            })?;

        if let Some(first) = progress.errors.into_iter().next() {
            let message = scalar_text(first.error_message)
                .unwrap_or_else(|| UNDESCRIBED_UPSTREAM_ERROR.to_owned());
            return Err(TrackingError::upstream_not_found(message));
        }

        let keys = scan_localisation_keys(&envelope.event_history);
        let history: EventHistoryDto =
            serde_json::from_str(&envelope.event_history).map_err(|e| {
                TrackingError::malformed_upstream_response(format!(
                    "Unable to decode eventHistory JSON: {e}"
                ))
            })?;

        let (shipper_name, carrier) = progress
            .summary
            .and_then(|summary| summary.metadata)
            .map_or((None, None), |metadata| {
                (
                    StringValueDto::into_value(metadata.shipper_name),
                    StringValueDto::into_value(metadata.last_leg_carrier),
                )
            });
        let summary = TrackingSummary {
            shipper_name,
            carrier,
            expected_delivery_date: scalar_text(progress.expected_delivery_date),
        };

        let translations = if keys.is_empty() {
            LocalizationMap::default()
        } else {
            self.translate(code, session, &keys)
                .await
                .unwrap_or_else(|error| {
                    warn!(tracking_code = %code, %error, "falling back to empty statuses");
                    LocalizationMap::default()
                })
        };
        debug!(
            tracking_code = %code,
            keys = keys.len(),
            translated = translations.len(),
            "tracking data decoded"
        );

        Ok(TrackingRecord {
            tracking_code: code.as_str().to_owned(),
            summary,
            history: history
                .event_history
                .into_iter()
                .map(|event| assemble_event(event, &translations))
                .collect(),
        })
    }

    async fn translate(
        &self,
        code: &TrackingCode,
        session: &Session,
        keys: &[String],
    ) -> Result<LocalizationMap, TrackingError> {
        let request = session
            .request(UpstreamMethod::Post, UpstreamEndpoint::LocalizedStrings)
            .with_json(json!({ "localizationKeys": keys }));
        let response = self
            .fetcher
            .send(&request)
            .await
            .map_err(|e| TrackingError::translation_unavailable(e.to_string()))?;
        let entries: HashMap<String, Value> = serde_json::from_str(&response.body)
            .map_err(|e| TrackingError::translation_unavailable(e.to_string()))?;
        let total = entries.len();
        let strings: LocalizationMap = entries
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(text) => Some((key, text)),
                _ => None,
            })
            .collect();
        if strings.len() < total {
            debug!(
                tracking_code = %code,
                skipped = total - strings.len(),
                "ignoring non-string translations"
            );
        }
        debug!(tracking_code = %code, count = strings.len(), "translations fetched");
        Ok(strings)
    }
}

fn assemble_event(event: RawEventDto, translations: &LocalizationMap) -> HistoryEvent {
    let key = event
        .status_summary
        .as_ref()
        .and_then(|summary| summary.localised_string_id.as_deref());
    HistoryEvent {
        status: translations.status_for(key),
        code: scalar_text(event.event_code).unwrap_or_default(),
        location: event.location,
        time: scalar_text(event.event_time).unwrap_or_default(),
    }
}
