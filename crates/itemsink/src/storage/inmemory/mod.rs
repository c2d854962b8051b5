//! In-memory storage backend.
//!
//! Stores records in a `HashMap` wrapped in `Arc<RwLock<_>>`, with the same
//! upsert semantics as the DynamoDB backend. Failures can be injected per key
//! to exercise the processor's error isolation.
//!
//! # Example
//!
//! ```rust,ignore
//! use itemsink::storage::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! repo.fail_on(RecordKey::new("g1", "u1"), RepositoryError::Throttled("slow down".into())).await;
//! ```

mod repository;

pub use repository::InMemoryRepository;
