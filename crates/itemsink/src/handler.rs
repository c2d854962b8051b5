//! Lambda invocation surface.
//!
//! Turns an SQS batch into [`InboundMessage`]s and hands them to the
//! processor. The invocation always succeeds: malformed messages and failed
//! writes are logged and dropped, never reported back to the queue.

use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{Error, LambdaEvent};

use itemsink_core::processing::{process_batch, BatchReport, InboundMessage};
use itemsink_core::storage::RecordRepository;

/// Maps SQS messages to processor input, preserving delivery order.
pub fn inbound_messages(event: &SqsEvent) -> Vec<InboundMessage> {
    event
        .records
        .iter()
        .map(|message| InboundMessage {
            message_id: message.message_id.clone(),
            body: message.body.clone(),
        })
        .collect()
}

/// Processes every message of `event` against `repository`.
pub async fn handle_event<R>(repository: &R, event: &SqsEvent) -> BatchReport
where
    R: RecordRepository + ?Sized,
{
    tracing::info!(count = event.records.len(), "Received batch");

    let report = process_batch(repository, inbound_messages(event)).await;

    if report.is_clean() {
        tracing::info!(summary = %report.summary(), "Batch processed");
    } else {
        tracing::warn!(summary = %report.summary(), "Batch processed with dropped messages");
    }

    report
}

/// Lambda entry point. Acknowledges the whole batch.
#[tracing::instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn function_handler<R>(repository: &R, event: LambdaEvent<SqsEvent>) -> Result<(), Error>
where
    R: RecordRepository + ?Sized,
{
    handle_event(repository, &event.payload).await;
    Ok(())
}
