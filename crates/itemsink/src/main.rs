use anyhow::{Context, Result};
use lambda_runtime::{service_fn, LambdaEvent};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aws_lambda_events::event::sqs::SqsEvent;
use itemsink::config::Config;
use itemsink::handler::function_handler;
use itemsink::storage::DynamoDbRepository;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber. CloudWatch adds its own timestamps.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itemsink=info,itemsink_core=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(false)
                .with_ansi(false)
                .without_time(),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let repository = &DynamoDbRepository::from_config(&config)
        .await
        .with_context(|| format!("Startup check of table '{}' failed", config.table_name))?;

    tracing::info!(
        table = repository.table_name(),
        target = %config.target_display(),
        "itemsink ready"
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SqsEvent>| async move {
        function_handler(repository, event).await
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
