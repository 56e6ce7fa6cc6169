use std::sync::Arc;

use super::transport::{EventRecord, EventTransport};
use super::{EventError, PaperCreatedEvent};

/// Fire-and-forget publisher for paper creation events.
///
/// `publish` returns as soon as the event is handed off. `Err` means the
/// event never left the process (it could not be serialized or dispatched);
/// the implementation logs that failure itself. Delivery outcomes are only
/// logged.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: &PaperCreatedEvent, partition_key: &str) -> Result<(), EventError>;
}

/// Publishes JSON-encoded events to one fixed topic over a transport.
pub struct TopicPublisher {
    topic: String,
    transport: Arc<dyn EventTransport>,
}

impl TopicPublisher {
    pub fn new(topic: impl Into<String>, transport: Arc<dyn EventTransport>) -> Self {
        Self {
            topic: topic.into(),
            transport,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    fn dispatch(&self, event: &PaperCreatedEvent, partition_key: &str) -> Result<(), EventError> {
        let payload = serde_json::to_string(event)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| EventError::NoRuntime)?;

        let record = EventRecord {
            topic: self.topic.clone(),
            key: partition_key.to_string(),
            payload,
        };
        let delivery = self.transport.send(record);
        let topic = self.topic.clone();
        let paper_id = partition_key.to_string();
        let transport = self.transport.name();

        runtime.spawn(async move {
            match delivery.await {
                Ok(()) => tracing::info!(
                    paper_id = %paper_id,
                    topic = %topic,
                    transport,
                    "Sent paper created event"
                ),
                Err(e) => tracing::error!(
                    paper_id = %paper_id,
                    topic = %topic,
                    transport,
                    error = %e,
                    "Failed to send paper created event"
                ),
            }
        });

        Ok(())
    }
}

impl EventPublisher for TopicPublisher {
    fn publish(&self, event: &PaperCreatedEvent, partition_key: &str) -> Result<(), EventError> {
        self.dispatch(event, partition_key).inspect_err(|e| {
            tracing::error!(
                paper_id = %partition_key,
                topic = %self.topic,
                error = %e,
                "Could not dispatch paper created event"
            );
        })
    }
}
