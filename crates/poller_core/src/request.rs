use chrono::{DateTime, TimeDelta, Utc};

use crate::SubmissionId;

/// IMF-fixdate, the format browsers produce for `Date.toUTCString()`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A single "anything new since?" question for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRequest {
    pub submission_id: SubmissionId,
    pub since: DateTime<Utc>,
}

impl PollRequest {
    /// Builds the request for a row whose last known update is `last_update`,
    /// moving the timestamp back by `backoff`.
    pub fn new(
        submission_id: SubmissionId,
        last_update: DateTime<Utc>,
        backoff: TimeDelta,
    ) -> Option<Self> {
        let since = last_update.checked_sub_signed(backoff)?;
        Some(Self {
            submission_id,
            since,
        })
    }

    pub fn since_http_date(&self) -> String {
        format_http_date(self.since)
    }

    /// Path segments below the server base: `submission/{id}/{since}`.
    pub fn path_segments(&self) -> [String; 3] {
        [
            "submission".to_string(),
            self.submission_id.to_string(),
            self.since_http_date(),
        ]
    }
}

pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}

/// Accepts RFC 3339 and RFC 2822 / HTTP dates, the two shapes a row date takes.
pub fn parse_row_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
}
