use async_trait::async_trait;

use crate::record::Record;

use super::Result;

/// Repository for record persistence.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Writes a record, creating it or fully replacing the item stored under
    /// the same `(groupId, id)` key.
    async fn put_record(&self, record: &Record) -> Result<()>;

    /// Gets a record by its composite key.
    async fn get_record(&self, group_id: &str, id: &str) -> Result<Option<Record>>;
}
