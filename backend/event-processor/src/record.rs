//! Broker record normalisation
use rdkafka::message::Message;
use serde::{Deserialize, Serialize};

use crate::error::ConsumerError;

/// A consumed record with its metadata, decoded once off the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerRecord {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Milliseconds since the epoch
    pub timestamp: i64,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl BrokerRecord {
    /// Normalise an rdkafka message.
    ///
    /// A missing broker timestamp falls back to the current wall-clock time.
    pub fn from_message<M: Message>(msg: &M) -> Result<Self, ConsumerError> {
        let timestamp = msg
            .timestamp()
            .to_millis()
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

        Ok(Self {
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            timestamp,
            key: decode(msg, msg.key(), "key")?,
            value: decode(msg, msg.payload(), "value")?,
        })
    }

    /// Key for log lines, `-` when the record has none
    pub fn display_key(&self) -> &str {
        self.key.as_deref().unwrap_or("-")
    }
}

fn decode<M: Message>(
    msg: &M,
    bytes: Option<&[u8]>,
    field: &'static str,
) -> Result<Option<String>, ConsumerError> {
    bytes
        .map(|b| {
            std::str::from_utf8(b)
                .map(str::to_string)
                .map_err(|_| ConsumerError::Decode {
                    topic: msg.topic().to_string(),
                    partition: msg.partition(),
                    offset: msg.offset(),
                    field,
                })
        })
        .transpose()
}
