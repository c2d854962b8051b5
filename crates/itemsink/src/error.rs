use thiserror::Error;

/// Errors that can occur while resolving and checking the startup configuration.
///
/// All of them are fatal: the function refuses to start rather than run
/// against the wrong table or endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Unknown profile '{0}' (expected 'aws' or 'local')")]
    InvalidProfile(String),

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    #[error("Cannot reach {target}: {reason}")]
    EndpointUnreachable { target: String, reason: String },

    #[error("Cannot check table '{table}': {reason}")]
    TableCheckFailed { table: String, reason: String },
}
