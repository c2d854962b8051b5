use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Throttled: {0}")]
    Throttled(String),
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Whether a later redelivery of the same message could succeed.
    ///
    /// Only used to enrich logs; the processor never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            RepositoryError::Throttled(_) | RepositoryError::ConnectionFailed(_) => true,
            RepositoryError::TableNotFound(_)
            | RepositoryError::WriteFailed(_)
            | RepositoryError::QueryFailed(_)
            | RepositoryError::InvalidData(_) => false,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_table_not_found_display() {
        let error = RepositoryError::TableNotFound("Items".to_string());
        assert_eq!(error.to_string(), "Table not found: Items");
    }

    #[test]
    fn test_repository_error_throttled_display() {
        let error = RepositoryError::Throttled("Throughput exceeded".to_string());
        assert_eq!(error.to_string(), "Throttled: Throughput exceeded");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_repository_error_invalid_data_display() {
        let error = RepositoryError::InvalidData("Missing or invalid field: count".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid data: Missing or invalid field: count"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(RepositoryError::Throttled(String::new()).is_retryable());
        assert!(RepositoryError::ConnectionFailed(String::new()).is_retryable());
        assert!(!RepositoryError::TableNotFound(String::new()).is_retryable());
        assert!(!RepositoryError::WriteFailed(String::new()).is_retryable());
        assert!(!RepositoryError::InvalidData(String::new()).is_retryable());
    }
}
