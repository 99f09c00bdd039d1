use std::fmt;

/// Position of a row in the table it was enumerated from.
pub type RowKey = usize;

/// One table row bound to a submission.
///
/// `url` and `date` mirror the data attributes the hosting page attaches to
/// the row; `content` is the rendered HTML, replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub url: String,
    pub date: String,
    pub content: String,
}

impl Row {
    pub fn new(url: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            date: date.into(),
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn submission_id(&self) -> SubmissionId {
        SubmissionId::from_row_url(&self.url)
    }
}

/// Opaque identifier taken from the last `/`-separated segment of a row URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// A URL ending in `/` yields an empty identifier.
    pub fn from_row_url(url: &str) -> Self {
        let segment = url.rsplit('/').next().unwrap_or(url);
        Self(segment.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
