//! Test table provisioning.
//!
//! The plan is pure; only `ensure_table` and its helpers talk to DynamoDB.

use std::time::Duration;

use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use itemsink_core::storage::{PARTITION_KEY, SORT_KEY};

use super::error::{IntegrationError, Result};

/// Table schema: string partition and sort keys, on-demand billing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: &'static str,
    pub sort_key: &'static str,
}

impl TableConfig {
    /// The record table layout under `table_name`.
    pub fn records(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key: PARTITION_KEY,
            sort_key: SORT_KEY,
        }
    }
}

/// Table status as reported by `DescribeTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
}

/// What `ensure_table` has to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TablePlan {
    Create { config: TableConfig },
    WaitForActive { table_name: String },
    NoChanges { table_name: String },
    Blocked { table_name: String },
}

/// Pure function: decide how to reach an active table.
pub fn calculate_plan(current: Option<TableStatus>, desired: &TableConfig) -> TablePlan {
    let table_name = desired.table_name.clone();
    match current {
        None => TablePlan::Create {
            config: desired.clone(),
        },
        Some(TableStatus::Active) => TablePlan::NoChanges { table_name },
        Some(TableStatus::Creating | TableStatus::Updating) => {
            TablePlan::WaitForActive { table_name }
        }
        Some(TableStatus::Deleting) => TablePlan::Blocked { table_name },
    }
}

/// Pure function: format a plan for display.
pub fn format_plan(plan: &TablePlan) -> Vec<String> {
    match plan {
        TablePlan::Create { config } => vec![
            format!("+ Create table: {}", config.table_name),
            format!("  Partition key: {} (S)", config.partition_key),
            format!("  Sort key: {} (S)", config.sort_key),
            "  Billing: PAY_PER_REQUEST".to_string(),
        ],
        TablePlan::WaitForActive { table_name } => {
            vec![format!("~ Waiting for table '{}' to become active", table_name)]
        }
        TablePlan::NoChanges { table_name } => {
            vec![format!("= Table '{}' is ready", table_name)]
        }
        TablePlan::Blocked { table_name } => {
            vec![format!("! Table '{}' is being deleted", table_name)]
        }
    }
}

/// Creates the table if needed and waits until it is active.
pub async fn ensure_table(client: &Client, config: &TableConfig) -> Result<TablePlan> {
    let current = get_table_status(client, &config.table_name).await?;
    let plan = calculate_plan(current, config);

    match &plan {
        TablePlan::Create { config } => {
            create_table(client, config).await?;
            wait_for_table_active(client, &config.table_name).await?;
        }
        TablePlan::WaitForActive { table_name } => {
            wait_for_table_active(client, table_name).await?;
        }
        TablePlan::NoChanges { .. } => {}
        TablePlan::Blocked { table_name } => {
            return Err(IntegrationError::TableDeleting {
                table_name: table_name.clone(),
            });
        }
    }

    Ok(plan)
}

/// Fetches the table status, `None` if the table doesn't exist.
async fn get_table_status(client: &Client, table_name: &str) -> Result<Option<TableStatus>> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(response) => {
            let status = match response.table().and_then(|t| t.table_status()) {
                Some(aws_sdk_dynamodb::types::TableStatus::Creating) => TableStatus::Creating,
                Some(aws_sdk_dynamodb::types::TableStatus::Updating) => TableStatus::Updating,
                Some(aws_sdk_dynamodb::types::TableStatus::Deleting) => TableStatus::Deleting,
                _ => TableStatus::Active,
            };
            Ok(Some(status))
        }
        Err(err) => match err.into_service_error() {
            DescribeTableError::ResourceNotFoundException(_) => Ok(None),
            err => Err(IntegrationError::AwsSdk(err.to_string())),
        },
    }
}

async fn create_table(client: &Client, config: &TableConfig) -> Result<()> {
    let key_schema = vec![
        key_element(config.partition_key, KeyType::Hash)?,
        key_element(config.sort_key, KeyType::Range)?,
    ];
    let attribute_definitions = vec![
        string_attribute(config.partition_key)?,
        string_attribute(config.sort_key)?,
    ];

    client
        .create_table()
        .table_name(&config.table_name)
        .set_key_schema(Some(key_schema))
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(|e| IntegrationError::AwsSdk(e.into_service_error().to_string()))?;

    Ok(())
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    let max_attempts = 30;
    let delay = Duration::from_secs(1);

    for _ in 0..max_attempts {
        if get_table_status(client, table_name).await? == Some(TableStatus::Active) {
            return Ok(());
        }
        tokio::time::sleep(delay).await;
    }

    Err(IntegrationError::TableActivationTimeout {
        table_name: table_name.to_string(),
    })
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(|e| IntegrationError::AwsSdk(e.to_string()))
}

fn string_attribute(name: &str) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| IntegrationError::AwsSdk(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_table_config_uses_record_keys() {
        let config = TableConfig::records("ItemsTest");

        assert_eq!(config.table_name, "ItemsTest");
        assert_eq!(config.partition_key, "groupId");
        assert_eq!(config.sort_key, "id");
    }

    #[test]
    fn test_plan_creates_missing_table() {
        let config = TableConfig::records("ItemsTest");

        assert_eq!(
            calculate_plan(None, &config),
            TablePlan::Create {
                config: config.clone()
            }
        );
    }

    #[test]
    fn test_plan_for_existing_table() {
        let config = TableConfig::records("ItemsTest");
        let name = || "ItemsTest".to_string();

        assert_eq!(
            calculate_plan(Some(TableStatus::Active), &config),
            TablePlan::NoChanges { table_name: name() }
        );
        assert_eq!(
            calculate_plan(Some(TableStatus::Creating), &config),
            TablePlan::WaitForActive { table_name: name() }
        );
        assert_eq!(
            calculate_plan(Some(TableStatus::Deleting), &config),
            TablePlan::Blocked { table_name: name() }
        );
    }

    #[test]
    fn test_format_create_plan() {
        let plan = TablePlan::Create {
            config: TableConfig::records("ItemsTest"),
        };

        assert_eq!(
            format_plan(&plan),
            vec![
                "+ Create table: ItemsTest",
                "  Partition key: groupId (S)",
                "  Sort key: id (S)",
                "  Billing: PAY_PER_REQUEST",
            ]
        );
    }
}
