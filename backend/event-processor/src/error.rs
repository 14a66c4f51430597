use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    #[error("End of partition reached {topic}/{partition}")]
    PartitionEof { topic: String, partition: i32 },

    #[error("Record {topic}/{partition}@{offset}: {field} is not valid UTF-8")]
    Decode {
        topic: String,
        partition: i32,
        offset: i64,
        field: &'static str,
    },
}

impl ConsumerError {
    /// Errors after which the client cannot continue
    pub fn is_fatal(&self) -> bool {
        match self {
            ConsumerError::Kafka(e) => e.rdkafka_error_code() == Some(RDKafkaErrorCode::Fatal),
            _ => false,
        }
    }
}
