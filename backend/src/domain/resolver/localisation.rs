//! Localisation keys and their translations.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

#[expect(
    clippy::expect_used,
    reason = "literal pattern is exercised by the unit tests below"
)]
static LOCALISED_STRING_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""localisedStringId":"([\w\-]+)""#).expect("localisation key pattern compiles")
});

/// Collect the distinct localisation keys in `raw`, in order of first
/// appearance.
///
/// The scan runs over the raw JSON text so markers nested anywhere in the
/// document are found, not only those on the event status path.
///
/// # Examples
/// ```
/// use parcel_tracker::domain::resolver::scan_localisation_keys;
///
/// let raw = r#"[{"localisedStringId":"b"},{"x":{"localisedStringId":"a"}},{"localisedStringId":"b"}]"#;
/// assert_eq!(scan_localisation_keys(raw), vec!["b", "a"]);
/// ```
#[must_use]
pub fn scan_localisation_keys(raw: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for captures in LOCALISED_STRING_ID.captures_iter(raw) {
        let Some(key) = captures.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if !keys.iter().any(|seen| seen == key) {
            keys.push(key.to_owned());
        }
    }
    keys
}

/// Translated display strings keyed by localisation key.
///
/// An empty map is the degraded state used when translations could not be
/// fetched; lookups then yield nothing and statuses render empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizationMap(HashMap<String, String>);

impl LocalizationMap {
    /// Translation for `key`, if the upstream supplied one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Status text for an optional key; empty when unresolved.
    #[must_use]
    pub fn status_for(&self, key: Option<&str>) -> String {
        key.and_then(|key| self.get(key))
            .unwrap_or_default()
            .to_owned()
    }

    /// Number of translations held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no translation is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for LocalizationMap {
    fn from(value: HashMap<String, String>) -> Self {
        Self(value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizationMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::none("[]", &[])]
    #[case::single(r#"{"localisedStringId":"swa_rex_delivered"}"#, &["swa_rex_delivered"])]
    #[case::dashes_and_digits(
        r#"{"localisedStringId":"swa-rex-2"}"#,
        &["swa-rex-2"]
    )]
    #[case::deduplicated_in_first_seen_order(
        r#"[{"localisedStringId":"b"},{"localisedStringId":"a"},{"localisedStringId":"b"}]"#,
        &["b", "a"]
    )]
    #[case::spaced_marker_ignored(r#"{"localisedStringId": "spaced"}"#, &[])]
    #[case::empty_key_ignored(r#"{"localisedStringId":""}"#, &[])]
    fn scans_raw_text_for_keys(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(scan_localisation_keys(raw), expected);
    }

    #[test]
    fn unresolved_keys_render_empty_status() {
        let map: LocalizationMap = [("known", "Consegnato")].into_iter().collect();

        assert_eq!(map.status_for(Some("known")), "Consegnato");
        assert_eq!(map.status_for(Some("unknown")), "");
        assert_eq!(map.status_for(None), "");
        assert_eq!(map.len(), 1);
    }
}
