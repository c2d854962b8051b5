//! DynamoDB repository implementation.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use itemsink_core::record::Record;
use itemsink_core::storage::{RecordRepository, Result, PARTITION_KEY, SORT_KEY};

use super::conversions::{item_to_record, record_to_item};
use super::error::{map_describe_table_error, map_get_item_error, map_put_item_error};
use crate::client::create_client;
use crate::config::Config;
use crate::error::ConfigError;

/// DynamoDB-based record repository.
///
/// Holds one client for the lifetime of the execution environment.
#[derive(Debug, Clone)]
pub struct DynamoDbRepository {
    client: Client,
    table_name: String,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a repository for the table and endpoint named by `config`.
    ///
    /// Runs one `DescribeTable` first: a missing table or an unreachable
    /// endpoint is a startup error, not a per-message failure.
    pub async fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let client = create_client(config).await;
        let repository = Self::new(client, &config.table_name);
        repository.check_table(&config.target_display()).await?;
        Ok(repository)
    }

    async fn check_table(&self, target: &str) -> std::result::Result<(), ConfigError> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, &self.table_name, target))?;

        Ok(())
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl RecordRepository for DynamoDbRepository {
    async fn put_record(&self, record: &Record) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &self.table_name))?;

        Ok(())
    }

    async fn get_record(&self, group_id: &str, id: &str) -> Result<Option<Record>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, AttributeValue::S(group_id.to_string()))
            .key(SORT_KEY, AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| map_get_item_error(e, &self.table_name))?;

        match result.item {
            Some(item) => Ok(Some(item_to_record(&item)?)),
            None => Ok(None),
        }
    }
}
