//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! records. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;
use std::str::FromStr;

use aws_sdk_dynamodb::types::AttributeValue;
use itemsink_core::record::Record;
use itemsink_core::storage::{RepositoryError, PARTITION_KEY, SORT_KEY};

const LABEL: &str = "label";
const AMOUNT: &str = "amount";
const COUNT: &str = "count";

/// Convert a Record to a DynamoDB item.
pub fn record_to_item(record: &Record) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();

    // Keys
    item.insert(
        PARTITION_KEY.to_string(),
        AttributeValue::S(record.group_id.clone()),
    );
    item.insert(SORT_KEY.to_string(), AttributeValue::S(record.id.clone()));

    // Data
    item.insert(LABEL.to_string(), AttributeValue::S(record.label.clone()));
    item.insert(AMOUNT.to_string(), AttributeValue::N(number_literal(record.amount)));
    item.insert(COUNT.to_string(), AttributeValue::N(record.count.to_string()));

    item
}

/// Convert a DynamoDB item to a Record.
pub fn item_to_record(item: &HashMap<String, AttributeValue>) -> Result<Record, RepositoryError> {
    Ok(Record {
        id: get_string(item, SORT_KEY)?,
        group_id: get_string(item, PARTITION_KEY)?,
        label: get_string(item, LABEL)?,
        amount: get_number(item, AMOUNT)?,
        count: get_number(item, COUNT)?,
    })
}

/// Formats a float as a DynamoDB number, switching to exponent notation for
/// magnitudes whose plain decimal form would run past 38 digits.
fn number_literal(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1e-6..1e21).contains(&magnitude) {
        value.to_string()
    } else {
        format!("{:e}", value)
    }
}

fn get_string(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

fn get_number<T: FromStr>(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<T, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}
