//! Configuration for the event processor
use serde::Deserialize;
use std::time::Duration;

/// Main configuration struct, loaded from environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Kafka broker addresses
    #[serde(default = "default_kafka_bootstrap_servers")]
    pub kafka_bootstrap_servers: String,

    /// Topic to consume
    #[serde(default = "default_kafka_topic")]
    pub kafka_topic: String,

    /// Consumer group id
    #[serde(default = "default_kafka_group_id")]
    pub kafka_group_id: String,

    #[serde(default = "default_auto_offset_reset")]
    pub auto_offset_reset: String,

    /// How long a single poll waits for a record
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,

    #[serde(default = "default_auto_commit_interval_ms")]
    pub auto_commit_interval_ms: u64,

    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: u64,

    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    /// Log verbosity used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_kafka_bootstrap_servers() -> String {
    "localhost:9092".to_string()
}

fn default_kafka_topic() -> String {
    event_schema::topics::EVENTS.to_string()
}

fn default_kafka_group_id() -> String {
    "event-processor-group".to_string()
}

fn default_auto_offset_reset() -> String {
    "earliest".to_string()
}

fn default_poll_timeout_ms() -> u64 {
    1000
}

fn default_auto_commit_interval_ms() -> u64 {
    1000
}

fn default_session_timeout_ms() -> u64 {
    6000
}

fn default_heartbeat_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Filter directives used when RUST_LOG is not set
    pub fn log_filter(&self) -> String {
        let level = self.log_level.to_lowercase();
        format!("{},event_processor={},rdkafka=warn", level, level)
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
