use chrono::{DateTime, Utc};

use crate::request::{format_http_date, parse_row_date};
use crate::view_model::RowView;
use crate::{PollRequest, PollTiming, Row, RowKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    /// Timer pending.
    #[default]
    Waiting,
    /// Request in flight.
    Requesting,
    /// Disposed; ignores all further input.
    Stopped,
}

/// Polling state for a single row. The owning poller is its only writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPoll {
    key: RowKey,
    row: Row,
    phase: PollPhase,
    timing: PollTiming,
    updates: u64,
}

impl RowPoll {
    pub fn new(key: RowKey, row: Row, timing: PollTiming) -> Self {
        Self {
            key,
            row,
            phase: PollPhase::Waiting,
            timing,
            updates: 0,
        }
    }

    pub fn key(&self) -> RowKey {
        self.key
    }

    pub fn row(&self) -> &Row {
        &self.row
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn timing(&self) -> PollTiming {
        self.timing
    }

    pub fn view(&self) -> RowView {
        RowView {
            key: self.key,
            submission_id: self.row.submission_id(),
            url: self.row.url.clone(),
            date: self.row.date.clone(),
            content: self.row.content.clone(),
            phase: self.phase,
            updates: self.updates,
        }
    }

    /// `None` when the row's date cannot be parsed.
    pub(crate) fn next_request(&self) -> Option<PollRequest> {
        let last_update = parse_row_date(&self.row.date)?;
        PollRequest::new(self.row.submission_id(), last_update, self.timing.backoff)
    }

    pub(crate) fn set_phase(&mut self, phase: PollPhase) {
        self.phase = phase;
    }

    /// Replaces the content wholesale and returns the new row date.
    pub(crate) fn apply_update(&mut self, body: String, received_at: DateTime<Utc>) -> String {
        let fresh = received_at
            .checked_sub_signed(self.timing.backoff)
            .unwrap_or(received_at);
        self.row.content = body;
        self.row.date = format_http_date(fresh);
        self.updates += 1;
        self.row.date.clone()
    }
}
