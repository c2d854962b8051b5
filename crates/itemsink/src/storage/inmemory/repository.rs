//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use itemsink_core::record::{Record, RecordKey};
use itemsink_core::storage::{RecordRepository, RepositoryError, Result};

/// In-memory record storage.
///
/// Clones share the same underlying maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<RwLock<HashMap<RecordKey, Record>>>,
    failures: Arc<RwLock<HashMap<RecordKey, RepositoryError>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later write of `key` fail with `error`.
    pub async fn fail_on(&self, key: RecordKey, error: RepositoryError) {
        self.failures.write().await.insert(key, error);
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn put_record(&self, record: &Record) -> Result<()> {
        let key = record.key();

        if let Some(error) = self.failures.read().await.get(&key) {
            return Err(error.clone());
        }

        self.records.write().await.insert(key, record.clone());
        Ok(())
    }

    async fn get_record(&self, group_id: &str, id: &str) -> Result<Option<Record>> {
        let records = self.records.read().await;
        Ok(records.get(&RecordKey::new(group_id, id)).cloned())
    }
}
