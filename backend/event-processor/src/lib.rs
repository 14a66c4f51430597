//! Event processor
//!
//! - `consumer`: sequential Kafka poll loop
//! - `processor`: per-record JSON parsing and summary logging
//! - `batch`: batch entry point over pre-fetched records

pub mod batch;
pub mod config;
pub mod consumer;
pub mod error;
pub mod processor;
pub mod record;

pub use batch::{handle_batch_payload, process_batch, BatchEvent, BatchReport};
pub use config::Config;
pub use consumer::{ConsumerLoop, ConsumerStats, KafkaRecordSource, RecordSource};
pub use error::ConsumerError;
pub use processor::{process_record, EventSummary, KafkaMetadata, ProcessOutcome};
pub use record::BrokerRecord;
