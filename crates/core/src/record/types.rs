use std::fmt;

use serde::{Deserialize, Serialize};

use super::RecordError;

/// Smallest non-zero magnitude DynamoDB can store in a number attribute.
pub const MIN_AMOUNT_MAGNITUDE: f64 = 1e-130;

/// Largest magnitude DynamoDB can store in a number attribute.
pub const MAX_AMOUNT_MAGNITUDE: f64 = 9.999_999_999_999_999e125;

/// A single item decoded from one queue message and persisted as one table item.
///
/// The legacy field names (`uuid`, `companyId`, `name`, `price`, `quantity`)
/// are accepted as aliases so older producers keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Record {
    /// Sort key.
    #[serde(alias = "uuid")]
    pub id: String,
    /// Partition key.
    #[serde(alias = "companyId")]
    pub group_id: String,
    #[serde(alias = "name")]
    pub label: String,
    #[serde(alias = "price")]
    pub amount: f64,
    #[serde(alias = "quantity")]
    pub count: i64,
}

/// Composite key identifying a record in storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub group_id: String,
    pub id: String,
}

impl RecordKey {
    pub fn new(group_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.group_id, self.id)
    }
}

impl Record {
    /// Creates a new record.
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        label: impl Into<String>,
        amount: f64,
        count: i64,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            label: label.into(),
            amount,
            count,
        }
    }

    /// Decodes a record from a raw message body.
    ///
    /// Fails on malformed JSON, missing or unknown fields, type mismatches and
    /// empty key fields.
    pub fn from_body(body: &str) -> Result<Self, RecordError> {
        let record: Record =
            serde_json::from_str(body).map_err(|e| RecordError::Malformed(e.to_string()))?;
        record.validate()?;
        Ok(record)
    }

    /// Checks the fields DynamoDB would refuse: empty key strings and
    /// amounts outside its number range.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.group_id.is_empty() {
            return Err(RecordError::EmptyKey { field: "groupId" });
        }
        if self.id.is_empty() {
            return Err(RecordError::EmptyKey { field: "id" });
        }
        let magnitude = self.amount.abs();
        if self.amount != 0.0
            && !(MIN_AMOUNT_MAGNITUDE..=MAX_AMOUNT_MAGNITUDE).contains(&magnitude)
        {
            return Err(RecordError::AmountOutOfRange {
                amount: format!("{:e}", self.amount),
            });
        }
        Ok(())
    }

    /// Returns the `(groupId, id)` key of this record.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.group_id, &self.id)
    }
}
