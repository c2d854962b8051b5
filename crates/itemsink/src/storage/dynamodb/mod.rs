//! DynamoDB storage backend.
//!
//! Records live in a single table keyed by `groupId` (partition) and `id`
//! (sort). Writes are unconditional `PutItem` calls, so a redelivered
//! message overwrites the item with identical content.

mod conversions;
mod error;
mod repository;

pub use conversions::{item_to_record, record_to_item};
pub use repository::DynamoDbRepository;
