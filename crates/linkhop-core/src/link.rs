use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored short link as returned by a link store.
///
/// Timestamps are kept in their ISO-8601 wire form; callers that need to
/// compare them parse on demand (see [`LinkRow::expires_at_ms`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRow {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub created_at: String,
    pub expires_at: String,
    pub clicks: i64,
}

impl LinkRow {
    /// Parses `expires_at` into Unix milliseconds.
    ///
    /// Returns `None` when the stored value is not a valid instant.
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.expires_at
            .parse::<Timestamp>()
            .ok()
            .map(|ts| ts.as_millisecond())
    }
}

/// The values a link store needs to insert a new row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub code: ShortCode,
    pub long_url: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Renders an instant as an ISO-8601 UTC string with millisecond precision,
/// e.g. `2026-01-01T00:00:00.000Z`.
pub fn format_instant(ts: Timestamp) -> String {
    format!("{ts:.3}")
}
