//! Storage backends implementing `itemsink_core::storage::RecordRepository`.
//!
//! - [`dynamodb`]: the production backend, one table item per record
//! - [`inmemory`]: a `HashMap` backed double for handler tests and local runs

pub mod dynamodb;
pub mod inmemory;

pub use dynamodb::DynamoDbRepository;
pub use inmemory::InMemoryRepository;
