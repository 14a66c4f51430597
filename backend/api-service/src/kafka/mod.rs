//! Kafka publishing for the API service
//!
//! - `EventPublisher`: seam used by the HTTP handlers
//! - `KafkaEventPublisher`: rdkafka-backed implementation

pub mod producer;

pub use producer::{EventPublisher, KafkaEventPublisher, PublishError};
