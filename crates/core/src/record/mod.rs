mod error;
mod types;

pub use error::RecordError;
pub use types::{Record, RecordKey, MAX_AMOUNT_MAGNITUDE, MIN_AMOUNT_MAGNITUDE};
