use thiserror::Error;

/// Errors that can occur when decoding a record from a message body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Message has no body")]
    MissingBody,
    #[error("Malformed record: {0}")]
    Malformed(String),
    #[error("Key field '{field}' cannot be empty")]
    EmptyKey { field: &'static str },
    #[error("Amount {amount} is outside the storable number range")]
    AmountOutOfRange { amount: String },
}
