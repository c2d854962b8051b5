//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `itemsink_core::storage`,
//! and the cold-start table check to `ConfigError`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use itemsink_core::storage::RepositoryError;

use crate::error::ConfigError;

/// Map a PutItem SDK error to RepositoryError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table_name: &str,
) -> RepositoryError {
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => connection_failed(&err),
        err => match err.into_service_error() {
            PutItemError::ResourceNotFoundException(_) => {
                RepositoryError::TableNotFound(table_name.to_string())
            }
            PutItemError::ProvisionedThroughputExceededException(_) => {
                RepositoryError::Throttled("Throughput exceeded".to_string())
            }
            PutItemError::RequestLimitExceeded(_) => {
                RepositoryError::Throttled("Request limit exceeded".to_string())
            }
            PutItemError::InternalServerError(_) => {
                RepositoryError::ConnectionFailed("DynamoDB internal server error".to_string())
            }
            err => RepositoryError::WriteFailed(format!(
                "PutItem failed: {}",
                DisplayErrorContext(err)
            )),
        },
    }
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table_name: &str,
) -> RepositoryError {
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => connection_failed(&err),
        err => match err.into_service_error() {
            GetItemError::ResourceNotFoundException(_) => {
                RepositoryError::TableNotFound(table_name.to_string())
            }
            GetItemError::ProvisionedThroughputExceededException(_) => {
                RepositoryError::Throttled("Throughput exceeded".to_string())
            }
            GetItemError::RequestLimitExceeded(_) => {
                RepositoryError::Throttled("Request limit exceeded".to_string())
            }
            GetItemError::InternalServerError(_) => {
                RepositoryError::ConnectionFailed("DynamoDB internal server error".to_string())
            }
            err => RepositoryError::QueryFailed(format!(
                "GetItem failed: {}",
                DisplayErrorContext(err)
            )),
        },
    }
}

/// Map the cold-start DescribeTable error to the fatal ConfigError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table_name: &str,
    target: &str,
) -> ConfigError {
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            ConfigError::EndpointUnreachable {
                target: target.to_string(),
                reason: DisplayErrorContext(&err).to_string(),
            }
        }
        err => match err.into_service_error() {
            DescribeTableError::ResourceNotFoundException(_) => {
                ConfigError::TableNotFound(table_name.to_string())
            }
            err => ConfigError::TableCheckFailed {
                table: table_name.to_string(),
                reason: DisplayErrorContext(err).to_string(),
            },
        },
    }
}

fn connection_failed<E, R>(err: &SdkError<E, R>) -> RepositoryError
where
    E: std::error::Error + 'static,
    R: Debug + 'static,
{
    RepositoryError::ConnectionFailed(DisplayErrorContext(err).to_string())
}
