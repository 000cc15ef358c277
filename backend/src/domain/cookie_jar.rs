//! Cookie jar codec for the upstream session handshake.
//!
//! The upstream service hands out its session cookies over several rounds.
//! [`CookieJar`] keeps the cookies observed so far in a stable order, knows
//! which names must be present before the session counts as complete, and
//! renders itself as a single `Cookie` request header value.

use std::sync::LazyLock;

use regex::Regex;

/// Cookie names the upstream service must issue before tracking data and
/// translations are served reliably.
pub const REQUIRED_SESSION_COOKIES: [&str; 4] =
    ["session-id", "session-id-time", "session-token", "ubid-acbit"];

#[expect(
    clippy::expect_used,
    reason = "literal pattern is exercised by the unit tests below"
)]
static SET_COOKIE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*set-cookie:[ \t]*([^\s=;]+)=([^;\r\n]*)")
        .expect("Set-Cookie pattern compiles")
});

/// Ordered name to value mapping of upstream cookies.
///
/// ## Invariants
/// - Names are unique; iteration order is the order in which a name was
///   first inserted.
/// - Required names are present from construction, initially empty.
///
/// # Examples
/// ```
/// use parcel_tracker::domain::{CookieJar, parse_set_cookies};
///
/// let mut jar = CookieJar::with_required(["session-id", "session-token"]);
/// assert!(!jar.is_fully_filled());
///
/// jar.merge(&parse_set_cookies(
///     "set-cookie: session-id=123-45; Path=/\r\nset-cookie: session-token=abc\r\n",
/// ));
/// assert!(jar.is_fully_filled());
/// assert_eq!(jar.to_header_value(), "session-id=123-45; session-token=abc");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    entries: Vec<(String, String)>,
    required: Vec<String>,
}

impl CookieJar {
    /// Create an empty jar with no required names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a jar whose required names start present but empty.
    #[must_use]
    pub fn with_required<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut jar = Self::new();
        for name in names {
            let name = name.into();
            if jar.get(&name).is_none() {
                jar.entries.push((name.clone(), String::new()));
                jar.required.push(name);
            }
        }
        jar
    }

    /// Create the jar used for one upstream session.
    #[must_use]
    pub fn session() -> Self {
        Self::with_required(REQUIRED_SESSION_COOKIES)
    }

    /// Look up the value stored for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set `name` to `value`, keeping the original position of an existing
    /// name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Overwrite this jar with every cookie observed in `other`.
    ///
    /// Later rounds win over earlier ones, so a refreshed value replaces the
    /// one sent on the previous request.
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    /// Whether every required name maps to a non-empty value.
    ///
    /// Cookies outside the required set never affect the result.
    #[must_use]
    pub fn is_fully_filled(&self) -> bool {
        self.required
            .iter()
            .all(|name| self.get(name).is_some_and(|value| !value.is_empty()))
    }

    /// Required names still lacking a value, in declaration order.
    #[must_use]
    pub fn missing(&self) -> Vec<&str> {
        self.required
            .iter()
            .filter(|name| self.get(name).is_none_or(str::is_empty))
            .map(String::as_str)
            .collect()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of stored cookies, including empty required placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the jar stores no cookies at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the non-empty cookies as a `Cookie` header value.
    ///
    /// Pairs are joined with `"; "` in insertion order. An empty jar, or one
    /// holding only empty values, renders as the empty string.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        self.iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Collect the cookies assigned by `Set-Cookie` lines in raw header text.
///
/// Only the leading `name=value` pair of each line is kept; attributes such as
/// `Path` or `Expires` are ignored. Lines without a `=` separator are skipped.
/// When a name repeats within the same text the first occurrence wins.
#[must_use]
pub fn parse_set_cookies(raw_headers: &str) -> CookieJar {
    let mut jar = CookieJar::new();
    for captures in SET_COOKIE_LINE.captures_iter(raw_headers) {
        let (Some(name), Some(value)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        if jar.get(name.as_str()).is_some() {
            continue;
        }
        jar.insert(name.as_str(), value.as_str().trim());
    }
    jar
}

#[cfg(test)]
mod tests {
    //! Codec behaviour for parsing and serialising session cookies.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn required_jar() -> CookieJar {
        CookieJar::with_required(["a", "b", "c", "d"])
    }

    #[rstest]
    fn fresh_session_jar_lists_required_names_empty() {
        let jar = CookieJar::session();
        assert_eq!(jar.len(), REQUIRED_SESSION_COOKIES.len());
        assert!(jar.iter().all(|(_, value)| value.is_empty()));
        assert_eq!(jar.missing(), REQUIRED_SESSION_COOKIES.to_vec());
        assert!(!jar.is_fully_filled());
    }

    #[rstest]
    #[case::none_filled(&[], false)]
    #[case::partially_filled(&[("a", "1"), ("b", "2"), ("c", "3")], false)]
    #[case::one_empty(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "")], false)]
    #[case::all_filled(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")], true)]
    fn fully_filled_requires_every_required_value(
        mut required_jar: CookieJar,
        #[case] values: &[(&str, &str)],
        #[case] expected: bool,
    ) {
        for (name, value) in values {
            required_jar.insert(*name, *value);
        }
        assert_eq!(required_jar.is_fully_filled(), expected);

        required_jar.insert("unrelated", "zzz");
        assert_eq!(
            required_jar.is_fully_filled(),
            expected,
            "unrelated cookies must not change the filled state"
        );
    }

    #[rstest]
    fn parse_keeps_first_occurrence_of_repeated_name() {
        let jar = parse_set_cookies(
            "Set-Cookie: session-id=first\r\nSet-Cookie: session-id=second\r\n",
        );
        assert_eq!(jar.get("session-id"), Some("first"));
        assert_eq!(jar.len(), 1);
    }

    #[rstest]
    fn parse_ignores_attributes_and_unrelated_headers() {
        let raw = "HTTP/1.1 200 OK\r\n\
                   content-type: text/html\r\n\
                   set-cookie: session-id=257-1234567-7654321; Domain=.example.it; Path=/\r\n\
                   SET-COOKIE: ubid-acbit=262-0000000-1111111; Expires=Wed, 01 Jan 2031 00:00:00 GMT\r\n\
                   x-cookie-note: set-cookie: bogus=1\r\n";
        let jar = parse_set_cookies(raw);
        let pairs: Vec<_> = jar.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("session-id", "257-1234567-7654321"),
                ("ubid-acbit", "262-0000000-1111111"),
            ]
        );
    }

    #[rstest]
    fn parse_skips_entries_without_separator() {
        let raw = "set-cookie: broken\r\nset-cookie: session-token=tok==\r\n";
        let jar = parse_set_cookies(raw);
        assert_eq!(jar.get("broken"), None);
        assert_eq!(jar.get("session-token"), Some("tok=="));
    }

    #[rstest]
    fn serialize_round_trips_parsed_pairs_in_order() {
        let raw = "set-cookie: b=2\nset-cookie: a=1; Secure\nset-cookie: c=3\n";
        assert_eq!(parse_set_cookies(raw).to_header_value(), "b=2; a=1; c=3");
    }

    #[rstest]
    #[case::empty_jar(CookieJar::new(), "")]
    #[case::only_placeholders(CookieJar::session(), "")]
    fn serialize_without_values_is_empty(#[case] jar: CookieJar, #[case] expected: &str) {
        assert_eq!(jar.to_header_value(), expected);
    }

    #[rstest]
    fn serialize_skips_empty_values_without_dangling_separator(mut required_jar: CookieJar) {
        required_jar.insert("b", "2");
        required_jar.insert("d", "4");
        assert_eq!(required_jar.to_header_value(), "b=2; d=4");
    }

    #[rstest]
    fn merge_overwrites_earlier_rounds_and_appends_new_names(mut required_jar: CookieJar) {
        required_jar.insert("a", "old");
        required_jar.merge(&parse_set_cookies(
            "set-cookie: a=new\r\nset-cookie: extra=x\r\n",
        ));
        assert_eq!(required_jar.get("a"), Some("new"));
        assert_eq!(
            required_jar.to_header_value(),
            "a=new; extra=x",
            "required names keep their position ahead of later cookies"
        );
    }
}
