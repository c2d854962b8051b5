mod error;
mod keys;
mod traits;

pub use error::{RepositoryError, Result};
pub use keys::{PARTITION_KEY, SORT_KEY};
pub use traits::RecordRepository;
