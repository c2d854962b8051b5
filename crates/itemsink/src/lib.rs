//! Queue consumer that persists item records into DynamoDB.
//!
//! The binary wires these pieces together at cold start: [`config::Config`]
//! is resolved once from the environment, [`client::create_client`] turns it
//! into a DynamoDB client, and [`handler::function_handler`] runs for every
//! SQS batch the Lambda runtime delivers.

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod storage;
