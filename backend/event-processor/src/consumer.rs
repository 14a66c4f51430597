//! Kafka consumer loop
//!
//! Polls one record at a time with a short timeout and hands each record to
//! [`process_record`]. Offsets are committed by the client's auto-commit
//! timer only; the loop never commits.

use async_trait::async_trait;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::ClientConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

use crate::config::Config;
use crate::error::ConsumerError;
use crate::processor::process_record;
use crate::record::BrokerRecord;

/// Source of broker records for the consumer loop
#[async_trait]
pub trait RecordSource: Send {
    /// Wait up to `timeout` for the next record. `None` means nothing arrived.
    async fn poll(&mut self, timeout: Duration) -> Option<Result<BrokerRecord, ConsumerError>>;

    /// Release the broker connection
    fn close(&mut self);
}

/// rdkafka-backed record source subscribed to a single topic
pub struct KafkaRecordSource {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaRecordSource {
    pub fn new(config: &Config) -> Result<Self, ConsumerError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.kafka_bootstrap_servers)
            .set("group.id", &config.kafka_group_id)
            .set("auto.offset.reset", &config.auto_offset_reset)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", config.auto_commit_interval_ms.to_string())
            .set("session.timeout.ms", config.session_timeout_ms.to_string())
            .set("heartbeat.interval.ms", config.heartbeat_interval_ms.to_string())
            .create()?;

        consumer.subscribe(&[config.kafka_topic.as_str()])?;

        info!(
            "Consumer created and subscribed to topic: {}",
            config.kafka_topic
        );

        Ok(Self {
            consumer,
            topic: config.kafka_topic.clone(),
        })
    }
}

#[async_trait]
impl RecordSource for KafkaRecordSource {
    async fn poll(&mut self, timeout: Duration) -> Option<Result<BrokerRecord, ConsumerError>> {
        match tokio::time::timeout(timeout, self.consumer.recv()).await {
            Err(_) => None,
            Ok(Ok(msg)) => Some(BrokerRecord::from_message(&msg)),
            Ok(Err(KafkaError::PartitionEOF(partition))) => Some(Err(ConsumerError::PartitionEof {
                topic: self.topic.clone(),
                partition,
            })),
            Ok(Err(e)) => Some(Err(e.into())),
        }
    }

    fn close(&mut self) {
        self.consumer.unsubscribe();
    }
}

/// Counters returned when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    pub received: u64,
    pub processed: u64,
    pub skipped: u64,
    pub errors: u64,
}

pub struct ConsumerLoop<S> {
    source: S,
    poll_timeout: Duration,
}

impl<S: RecordSource> ConsumerLoop<S> {
    pub fn new(source: S, poll_timeout: Duration) -> Self {
        Self {
            source,
            poll_timeout,
        }
    }

    /// Run until `shutdown` resolves or the source reports a fatal error,
    /// then close the source.
    pub async fn run<F>(mut self, shutdown: F) -> ConsumerStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut stats = ConsumerStats::default();

        info!("Starting event processor consumer...");

        loop {
            let polled = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Consumer interrupted by shutdown signal");
                    break;
                }
                polled = self.source.poll(self.poll_timeout) => polled,
            };

            match polled {
                None => continue,
                Some(Ok(record)) => self.handle(&record, &mut stats),
                Some(Err(ConsumerError::PartitionEof { topic, partition })) => {
                    info!("End of partition reached {}/{}", topic, partition);
                }
                Some(Err(e)) if e.is_fatal() => {
                    stats.errors += 1;
                    error!("Unexpected error in consumer: {}", e);
                    break;
                }
                Some(Err(e)) => {
                    stats.errors += 1;
                    if let ConsumerError::Decode {
                        topic,
                        partition,
                        offset,
                        ..
                    } = &e
                    {
                        error!("Error processing message: {}", e);
                        error!(
                            "Message details: topic={}, partition={}, offset={}",
                            topic, partition, offset
                        );
                    } else {
                        error!("Consumer error: {}", e);
                    }
                }
            }
        }

        info!("Closing consumer");
        self.source.close();
        stats
    }

    fn handle(&self, record: &BrokerRecord, stats: &mut ConsumerStats) {
        stats.received += 1;
        info!(
            "Received message: {} from {}",
            record.display_key(),
            record.topic
        );

        if process_record(record).is_processed() {
            stats.processed += 1;
        } else {
            stats.skipped += 1;
        }

        info!("Successfully processed message: {}", record.display_key());
    }
}
