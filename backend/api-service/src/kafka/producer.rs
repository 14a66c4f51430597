//! Time event producer
//!
//! Publishing is fire-and-forget: `publish` returns once the record is in the
//! client's send queue, and the delivery report is awaited on a detached task
//! that only logs the outcome. Retries and backoff belong to librdkafka.

use async_trait::async_trait;
use event_schema::TimeEvent;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to create producer: {0}")]
    Client(#[from] rdkafka::error::KafkaError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to enqueue record: {0}")]
    Enqueue(String),
}

/// Publishes time events to the broker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Submit `event` under `key`. Success means the record was accepted for
    /// delivery, not that the broker acknowledged it.
    async fn publish(&self, key: &str, event: &TimeEvent) -> Result<(), PublishError>;
}

/// rdkafka-backed publisher bound to a single topic
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaEventPublisher {
    /// Create a producer with:
    /// - `acks = all`
    /// - client-side `retries` and `retry.backoff.ms` from config
    /// - `compression.type = snappy`
    pub fn new(config: &Config) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.kafka_bootstrap_servers)
            .set("retries", config.kafka_retries.to_string())
            .set("retry.backoff.ms", config.kafka_retry_backoff_ms.to_string())
            .set("acks", "all")
            .set("compression.type", "snappy")
            .set("message.timeout.ms", config.kafka_message_timeout_ms.to_string())
            .create()?;

        info!(
            brokers = %config.kafka_bootstrap_servers,
            topic = %config.kafka_topic,
            "Kafka producer initialized"
        );

        Ok(Self {
            producer,
            topic: config.kafka_topic.clone(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Best-effort flush of queued records, used on shutdown
    pub fn flush(&self, timeout: Duration) {
        if let Err(e) = self.producer.flush(timeout) {
            error!(error = %e, "Failed to flush Kafka producer");
        } else {
            info!("Kafka producer flushed");
        }
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, key: &str, event: &TimeEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)?;
        let record = FutureRecord::to(&self.topic).key(key).payload(&payload);

        let delivery = self
            .producer
            .send_result(record)
            .map_err(|(err, _)| PublishError::Enqueue(err.to_string()))?;

        let topic = self.topic.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            match delivery.await {
                Ok(Ok((partition, offset))) => {
                    debug!(topic = %topic, key = %key, partition, offset, "Record delivered");
                }
                Ok(Err((err, _))) => {
                    error!(topic = %topic, key = %key, error = %err, "Record delivery failed");
                }
                Err(_) => {
                    error!(topic = %topic, key = %key, "Delivery report dropped");
                }
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_creation_does_not_need_a_live_broker() {
        let config = Config::from_vars(vec![(
            "KAFKA_TOPIC".to_string(),
            "time-events".to_string(),
        )])
        .unwrap();

        let publisher = KafkaEventPublisher::new(&config).unwrap();
        assert_eq!(publisher.topic(), "time-events");
    }

    #[tokio::test]
    async fn test_mock_publisher_sees_key_and_event() {
        let mut mock = MockEventPublisher::new();
        mock.expect_publish()
            .withf(|key, event| key == "time_10" && event.name == "Ada")
            .times(1)
            .returning(|_, _| Ok(()));

        let event = TimeEvent::new("Ada", 10);
        mock.publish(&event.key(), &event).await.unwrap();
    }
}
