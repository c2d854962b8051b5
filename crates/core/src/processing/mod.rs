//! Message processing contract.
//!
//! Every message of a delivered batch is handled on its own: decode the body
//! into a [`Record`], upsert it, note the outcome. A failure on one message
//! never stops the rest of the batch, and nothing here retries. Redelivery is
//! the queue's business.

mod report;

pub use report::{BatchReport, MessageOutcome, MessageReport};

use crate::record::{Record, RecordError};
use crate::storage::RecordRepository;

/// A raw message as handed over by the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    pub message_id: Option<String>,
    pub body: Option<String>,
}

impl InboundMessage {
    pub fn new(message_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_id: Some(message_id.into()),
            body: Some(body.into()),
        }
    }
}

/// Processes a batch sequentially, in delivery order.
pub async fn process_batch<R, I>(repository: &R, messages: I) -> BatchReport
where
    R: RecordRepository + ?Sized,
    I: IntoIterator<Item = InboundMessage>,
{
    let mut report = BatchReport::default();

    for message in messages {
        let outcome = process_message(repository, &message).await;
        report.push(MessageReport {
            message_id: message.message_id,
            outcome,
        });
    }

    report
}

/// Processes a single message: decode, then one write.
pub async fn process_message<R>(repository: &R, message: &InboundMessage) -> MessageOutcome
where
    R: RecordRepository + ?Sized,
{
    let message_id = message.message_id.as_deref().unwrap_or("-");

    let record = match decode(message) {
        Ok(record) => record,
        Err(error) => {
            tracing::warn!(message_id, error = %error, "Skipping malformed message");
            return MessageOutcome::Malformed { error };
        }
    };

    let key = record.key();
    match repository.put_record(&record).await {
        Ok(()) => {
            tracing::info!(
                message_id,
                group_id = %key.group_id,
                id = %key.id,
                "Saved record"
            );
            MessageOutcome::Written { key }
        }
        Err(error) => {
            tracing::error!(
                message_id,
                group_id = %key.group_id,
                id = %key.id,
                retryable = error.is_retryable(),
                error = %error,
                "Failed to save record"
            );
            MessageOutcome::Failed { key, error }
        }
    }
}

fn decode(message: &InboundMessage) -> Result<Record, RecordError> {
    let body = message.body.as_deref().ok_or(RecordError::MissingBody)?;
    Record::from_body(body)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::record::RecordKey;
    use crate::storage::{RepositoryError, Result};

    /// Upserting test double that counts writes and fails on chosen keys.
    #[derive(Default)]
    struct RecordingRepository {
        items: Mutex<HashMap<RecordKey, Record>>,
        writes: Mutex<Vec<RecordKey>>,
        failing: HashSet<RecordKey>,
    }

    impl RecordingRepository {
        fn failing_on(key: RecordKey) -> Self {
            Self {
                failing: HashSet::from([key]),
                ..Default::default()
            }
        }

        fn get(&self, group_id: &str, id: &str) -> Option<Record> {
            self.items
                .lock()
                .unwrap()
                .get(&RecordKey::new(group_id, id))
                .cloned()
        }

        fn len(&self) -> usize {
            self.items.lock().unwrap().len()
        }

        fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RecordRepository for RecordingRepository {
        async fn put_record(&self, record: &Record) -> Result<()> {
            let key = record.key();
            self.writes.lock().unwrap().push(key.clone());
            if self.failing.contains(&key) {
                return Err(RepositoryError::Throttled("Throughput exceeded".to_string()));
            }
            self.items.lock().unwrap().insert(key, record.clone());
            Ok(())
        }

        async fn get_record(&self, group_id: &str, id: &str) -> Result<Option<Record>> {
            Ok(self.get(group_id, id))
        }
    }

    fn body(id: &str, group_id: &str, amount: f64) -> String {
        format!(
            r#"{{"id":"{id}","groupId":"{group_id}","label":"Widget","amount":{amount},"count":3}}"#
        )
    }

    #[tokio::test]
    async fn test_well_formed_message_is_written() {
        let repo = RecordingRepository::default();
        let batch = vec![InboundMessage::new(
            "m1",
            r#"{"id":"u1","groupId":"g1","label":"Widget","amount":9.99,"count":3}"#,
        )];

        let report = process_batch(&repo, batch).await;

        assert_eq!(report.written(), 1);
        assert_eq!(
            repo.get("g1", "u1"),
            Some(Record::new("u1", "g1", "Widget", 9.99, 3))
        );
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_message_is_skipped_without_write() {
        let repo = RecordingRepository::default();
        let batch = vec![
            InboundMessage::new("m1", "{not json"),
            InboundMessage {
                message_id: Some("m2".to_string()),
                body: None,
            },
        ];

        let report = process_batch(&repo, batch).await;

        assert_eq!(report.malformed(), 2);
        assert_eq!(repo.write_count(), 0);
        assert!(matches!(
            report.messages()[1].outcome,
            MessageOutcome::Malformed {
                error: RecordError::MissingBody
            }
        ));
    }

    #[tokio::test]
    async fn test_batch_isolation_in_either_order() {
        for malformed_first in [true, false] {
            let repo = RecordingRepository::default();
            let good = InboundMessage::new("good", body("u1", "g1", 1.5));
            let bad = InboundMessage::new("bad", r#"{"id":"u2"}"#);
            let batch = if malformed_first {
                vec![bad, good]
            } else {
                vec![good, bad]
            };

            let report = process_batch(&repo, batch).await;

            assert_eq!(report.written(), 1);
            assert_eq!(report.malformed(), 1);
            assert!(repo.get("g1", "u1").is_some());
            assert!(repo.get("g1", "u2").is_none());
        }
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_stop_batch() {
        let repo = RecordingRepository::failing_on(RecordKey::new("g1", "u1"));
        let batch = vec![
            InboundMessage::new("m1", body("u1", "g1", 1.0)),
            InboundMessage::new("m2", body("u2", "g1", 2.0)),
        ];

        let report = process_batch(&repo, batch).await;

        assert_eq!(report.failed(), 1);
        assert_eq!(report.written(), 1);
        assert_eq!(repo.write_count(), 2);
        assert!(repo.get("g1", "u2").is_some());
        assert!(matches!(
            &report.messages()[0].outcome,
            MessageOutcome::Failed { key, error: RepositoryError::Throttled(_) }
                if key == &RecordKey::new("g1", "u1")
        ));
    }

    #[tokio::test]
    async fn test_reprocessing_is_idempotent() {
        let repo = RecordingRepository::default();
        let message = InboundMessage::new("m1", body("u1", "g1", 4.25));

        process_batch(&repo, vec![message.clone()]).await;
        let once = repo.get("g1", "u1");
        process_batch(&repo, vec![message]).await;

        assert_eq!(repo.get("g1", "u1"), once);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_same_key_last_write_wins() {
        let repo = RecordingRepository::default();
        let batch = vec![
            InboundMessage::new("m1", body("u1", "g1", 1.0)),
            InboundMessage::new("m2", body("u1", "g1", 2.0)),
        ];

        let report = process_batch(&repo, batch).await;

        assert_eq!(report.written(), 2);
        assert_eq!(repo.get("g1", "u1").map(|r| r.amount), Some(2.0));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let repo = RecordingRepository::default();

        let report = process_batch(&repo, Vec::new()).await;

        assert_eq!(report.total(), 0);
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn test_report_preserves_message_ids_in_order() {
        let repo = RecordingRepository::default();
        let batch = vec![
            InboundMessage::new("a", body("u1", "g1", 1.0)),
            InboundMessage::new("b", "[]"),
            InboundMessage::new("c", body("u2", "g1", 1.0)),
        ];

        let report = process_batch(&repo, batch).await;
        let ids: Vec<_> = report
            .messages()
            .iter()
            .map(|m| m.message_id.as_deref().unwrap())
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
