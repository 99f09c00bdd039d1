use crate::{PollPhase, RowKey, SubmissionId};

/// Read-only snapshot of a row for observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub key: RowKey,
    pub submission_id: SubmissionId,
    pub url: String,
    pub date: String,
    pub content: String,
    pub phase: PollPhase,
    pub updates: u64,
}
