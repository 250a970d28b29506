//! Event domain entity
//!
//! An event is one normalized occurrence derived from an inbound webhook
//! payload. Events are immutable once written and only ever removed by the
//! per-feed retention window.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Store-assigned ordinal of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EventId(pub i64);

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One title/description/link triple produced by a transformation.
///
/// Fields are optional here so the normalizer can reject incomplete output
/// instead of silently defaulting it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl RawItem {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            link: Some(link.into()),
        }
    }
}

/// A persisted event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: EventId,
    pub feed_id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub guid: String,
    pub pub_date: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub raw_msg: String,
    pub msg_hash: String,
    pub is_test: bool,
}

/// A normalized event ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub feed_id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub guid: String,
    pub pub_date: DateTime<Utc>,
    pub raw_msg: String,
    pub msg_hash: String,
    pub is_test: bool,
}

/// Render a publication timestamp in its stored form.
///
/// Fixed-width RFC 3339 with microseconds and an explicit `+00:00` offset, so
/// lexical order of the stored text equals chronological order.
pub fn format_pub_date(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse a stored publication timestamp
pub fn parse_pub_date(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn pub_date_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let s = format_pub_date(&whole);
        assert_eq!(s, "2024-03-01T12:00:00.000000+00:00");
        assert_eq!(parse_pub_date(&s).unwrap(), whole);
    }

    #[test]
    fn pub_date_text_sorts_chronologically() {
        let a = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let b = a + chrono::Duration::microseconds(5);
        let c = a + chrono::Duration::seconds(1);
        let mut texts = vec![format_pub_date(&c), format_pub_date(&a), format_pub_date(&b)];
        texts.sort();
        assert_eq!(
            texts,
            vec![format_pub_date(&a), format_pub_date(&b), format_pub_date(&c)]
        );
    }

    #[test]
    fn event_id_display() {
        assert_eq!(EventId(42).to_string(), "42");
    }
}
