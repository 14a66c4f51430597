//! Configuration for the API service
use serde::Deserialize;

/// Service configuration, loaded from environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Kafka broker addresses
    #[serde(default = "default_kafka_bootstrap_servers")]
    pub kafka_bootstrap_servers: String,

    /// Topic that receives time events
    #[serde(default = "default_kafka_topic")]
    pub kafka_topic: String,

    /// Producer retries handled by the Kafka client
    #[serde(default = "default_kafka_retries")]
    pub kafka_retries: u32,

    #[serde(default = "default_kafka_retry_backoff_ms")]
    pub kafka_retry_backoff_ms: u64,

    /// Upper bound on delivery time for a single record
    #[serde(default = "default_kafka_message_timeout_ms")]
    pub kafka_message_timeout_ms: u64,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

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

fn default_kafka_retries() -> u32 {
    3
}

fn default_kafka_retry_backoff_ms() -> u64 {
    1000
}

fn default_kafka_message_timeout_ms() -> u64 {
    30000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
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

    /// Filter directives used when RUST_LOG is not set
    pub fn log_filter(&self) -> String {
        format!(
            "{},api_service={},rdkafka=warn",
            self.log_level.to_lowercase(),
            self.log_level.to_lowercase()
        )
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.kafka_bootstrap_servers, "localhost:9092");
        assert_eq!(config.kafka_topic, "events");
        assert_eq!(config.kafka_retries, 3);
        assert_eq!(config.kafka_retry_backoff_ms, 1000);
        assert_eq!(config.port, 5000);
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs());
    }

    #[test]
    fn test_overrides_from_env() {
        let vars = vec![
            ("KAFKA_BOOTSTRAP_SERVERS".to_string(), "kafka-1:9092,kafka-2:9092".to_string()),
            ("KAFKA_TOPIC".to_string(), "time-events".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("LOG_LEVEL".to_string(), "DEBUG".to_string()),
            ("LOG_FORMAT".to_string(), "json".to_string()),
        ];
        let config = Config::from_vars(vars).unwrap();
        assert_eq!(config.kafka_bootstrap_servers, "kafka-1:9092,kafka-2:9092");
        assert_eq!(config.kafka_topic, "time-events");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_filter(), "debug,api_service=debug,rdkafka=warn");
        assert!(config.json_logs());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let vars = vec![("PORT".to_string(), "not-a-port".to_string())];
        assert!(Config::from_vars(vars).is_err());
    }
}
