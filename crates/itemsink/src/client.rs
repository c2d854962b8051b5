//! DynamoDB client factory.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client;

use crate::config::{Config, Profile};

/// Creates a DynamoDB client for the given configuration.
///
/// Call once per cold start; the client is cheap to clone and safe to share
/// across invocations.
pub async fn create_client(config: &Config) -> Client {
    let mut sdk_config_loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    if config.profile == Profile::Local {
        sdk_config_loader = sdk_config_loader.credentials_provider(local_credentials());
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// Static credentials accepted by DynamoDB Local and LocalStack.
fn local_credentials() -> Credentials {
    Credentials::new("test", "test", None, None, "itemsink-local")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_client_uses_configured_region() {
        let config = Config::local("Items", "http://localhost:8000");
        let client = create_client(&config).await;

        assert_eq!(client.config().region().unwrap().to_string(), "us-east-1");
    }

    #[tokio::test]
    async fn test_create_client_with_custom_region() {
        let mut config = Config::local("Items", "http://localhost:8000");
        config.region = "eu-central-1".to_string();
        let client = create_client(&config).await;

        assert_eq!(
            client.config().region().unwrap().to_string(),
            "eu-central-1"
        );
    }
}
