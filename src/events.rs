//! Optional NATS publisher for domain events.

use crate::domain::events::DomainEvent;

#[derive(Clone, Default)]
pub struct EventPublisher { nats: Option<async_nats::Client> }

impl EventPublisher {
    pub fn new(nats: Option<async_nats::Client>) -> Self { Self { nats } }
    pub fn disabled() -> Self { Self::default() }

    /// Fire-and-forget: a failed publish is logged and never reaches the caller.
    pub async fn publish(&self, event: DomainEvent) {
        let Some(client) = &self.nats else {
            tracing::debug!(subject = event.subject(), "event bus disabled, dropping event");
            return;
        };
        let payload = match serde_json::to_vec(&event) {
            Ok(p) => p,
            Err(e) => { tracing::warn!(error = %e, "failed to serialize event"); return; }
        };
        if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
            tracing::warn!(subject = event.subject(), error = %e, "failed to publish event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::ProductEvent;

    #[tokio::test]
    async fn test_disabled_publisher_is_noop() {
        let publisher = EventPublisher::disabled();
        publisher.publish(DomainEvent::Product(ProductEvent::Created { product_id: uuid::Uuid::nil(), name: "x".into(), stock_quantity: 0 })).await;
    }
}
