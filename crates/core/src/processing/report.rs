use crate::record::{RecordError, RecordKey};
use crate::storage::RepositoryError;

/// What happened to a single message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    /// The record was upserted.
    Written { key: RecordKey },
    /// The body could not be decoded; nothing was written.
    Malformed { error: RecordError },
    /// The body decoded but the write failed.
    Failed {
        key: RecordKey,
        error: RepositoryError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageReport {
    pub message_id: Option<String>,
    pub outcome: MessageOutcome,
}

/// Per-message outcomes of one invocation, in delivery order.
///
/// Only used for observability: the batch is acknowledged whatever it holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    messages: Vec<MessageReport>,
}

impl BatchReport {
    pub fn push(&mut self, report: MessageReport) {
        self.messages.push(report);
    }

    pub fn messages(&self) -> &[MessageReport] {
        &self.messages
    }

    pub fn total(&self) -> usize {
        self.messages.len()
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Written { .. }))
    }

    pub fn malformed(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Malformed { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Failed { .. }))
    }

    /// True when every message was written.
    pub fn is_clean(&self) -> bool {
        self.written() == self.total()
    }

    /// Short status line, e.g. `3 messages: 2 written, 1 malformed, 0 failed`.
    pub fn summary(&self) -> String {
        let total = self.total();
        format!(
            "{} {}: {} written, {} malformed, {} failed",
            total,
            if total == 1 { "message" } else { "messages" },
            self.written(),
            self.malformed(),
            self.failed()
        )
    }

    fn count(&self, pred: impl Fn(&MessageOutcome) -> bool) -> usize {
        self.messages.iter().filter(|m| pred(&m.outcome)).count()
    }
}
