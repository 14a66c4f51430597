//! Per-record processing
//!
//! Parses the record value as JSON and logs a summary merging the payload
//! fields with the broker metadata. `time_request` events get one extra line.

use event_schema::{topics, EventPayload};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::record::BrokerRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KafkaMetadata {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub timestamp: i64,
}

/// Log entry written for every processed event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub event_id: Value,
    pub event_type: Value,
    pub user: Value,
    pub message: Value,
    pub original_timestamp: Value,
    /// Epoch seconds at processing time
    pub processed_timestamp: i64,
    pub kafka_metadata: KafkaMetadata,
}

impl EventSummary {
    fn new(payload: EventPayload, record: &BrokerRecord) -> Self {
        Self {
            event_id: payload.id,
            event_type: payload.event_type,
            user: payload.user,
            message: payload.message,
            original_timestamp: payload.timestamp,
            processed_timestamp: chrono::Utc::now().timestamp(),
            kafka_metadata: KafkaMetadata {
                topic: record.topic.clone(),
                partition: record.partition,
                offset: record.offset,
                timestamp: record.timestamp,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// Value missing or empty
    SkippedEmpty,
    /// Value is not a JSON object
    SkippedMalformed,
    Processed {
        summary: EventSummary,
        /// Whether the extra `time_request` line was written
        time_request: bool,
    },
}

impl ProcessOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, ProcessOutcome::Processed { .. })
    }
}

/// Parse a record value; only JSON objects are events
fn parse_payload(raw: &str) -> Result<EventPayload, String> {
    match serde_json::from_str::<Value>(raw).map_err(|e| e.to_string())? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(|e| e.to_string()),
        other => Err(format!("expected a JSON object, found {}", kind(&other))),
    }
}

/// `user` as written in the time-request line: strings bare, anything else as JSON
fn user_label(user: &Value) -> String {
    match user.as_str() {
        Some(user) => user.to_string(),
        None => user.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Process one normalised record
pub fn process_record(record: &BrokerRecord) -> ProcessOutcome {
    let raw = match record.value.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => {
            warn!(
                topic = %record.topic,
                partition = record.partition,
                offset = record.offset,
                "Empty message value received"
            );
            return ProcessOutcome::SkippedEmpty;
        }
    };

    let payload = match parse_payload(raw) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Invalid JSON in message: {}", e);
            error!("Raw message: {}", raw);
            return ProcessOutcome::SkippedMalformed;
        }
    };

    let time_request = payload.is_type(topics::TIME_REQUEST);
    let user = user_label(&payload.user);
    let summary = EventSummary::new(payload, record);

    info!(
        "Event processed: {}",
        serde_json::to_string(&summary).unwrap_or_default()
    );

    if time_request {
        info!("Time request processed for user: {}", user);
    }

    ProcessOutcome::Processed {
        summary,
        time_request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Option<&str>) -> BrokerRecord {
        BrokerRecord {
            topic: "events".to_string(),
            partition: 1,
            offset: 99,
            timestamp: 1_700_000_000_000,
            key: Some("time_1700000000".to_string()),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_value_is_skipped() {
        assert_eq!(process_record(&record(None)), ProcessOutcome::SkippedEmpty);
    }

    #[test]
    fn test_empty_value_is_skipped() {
        assert_eq!(process_record(&record(Some(""))), ProcessOutcome::SkippedEmpty);
    }

    #[test]
    fn test_invalid_json_is_skipped() {
        assert_eq!(
            process_record(&record(Some("{not json"))),
            ProcessOutcome::SkippedMalformed
        );
    }

    #[test]
    fn test_non_object_json_is_skipped() {
        assert_eq!(
            process_record(&record(Some("[1, 2, 3]"))),
            ProcessOutcome::SkippedMalformed
        );
        assert_eq!(
            process_record(&record(Some("null"))),
            ProcessOutcome::SkippedMalformed
        );
        assert_eq!(
            process_record(&record(Some("[]"))),
            ProcessOutcome::SkippedMalformed
        );
        assert_eq!(
            process_record(&record(Some(r#""time_request""#))),
            ProcessOutcome::SkippedMalformed
        );
    }

    #[test]
    fn test_array_shaped_like_an_event_is_skipped() {
        assert_eq!(
            process_record(&record(Some(r#"["x", "time_request", "u"]"#))),
            ProcessOutcome::SkippedMalformed
        );
    }

    #[test]
    fn test_parse_payload_names_the_wrong_shape() {
        let err = parse_payload("[1, 2, 3]").unwrap_err();
        assert!(err.contains("an array"));
        assert!(parse_payload("{}").unwrap().id.is_null());
    }

    #[test]
    fn test_summary_merges_payload_and_metadata() {
        let before = chrono::Utc::now().timestamp();
        let outcome = process_record(&record(Some(
            r#"{"id": "evt-1", "type": "signup", "user": "ada", "message": "hi", "timestamp": 1700000000}"#,
        )));

        let ProcessOutcome::Processed {
            summary,
            time_request,
        } = outcome
        else {
            panic!("expected processed outcome");
        };

        assert!(!time_request);
        assert_eq!(summary.event_id, json!("evt-1"));
        assert_eq!(summary.event_type, json!("signup"));
        assert_eq!(summary.user, json!("ada"));
        assert_eq!(summary.message, json!("hi"));
        assert_eq!(summary.original_timestamp, json!(1_700_000_000));
        assert!(summary.processed_timestamp >= before);
        assert_eq!(
            summary.kafka_metadata,
            KafkaMetadata {
                topic: "events".to_string(),
                partition: 1,
                offset: 99,
                timestamp: 1_700_000_000_000,
            }
        );
    }

    #[test]
    fn test_missing_fields_surface_as_null() {
        let outcome = process_record(&record(Some(
            r#"{"timestamp": 1700000000, "message": "Hello Anonymous", "name": "Anonymous"}"#,
        )));

        let ProcessOutcome::Processed { summary, .. } = outcome else {
            panic!("expected processed outcome");
        };

        let logged = serde_json::to_value(&summary).unwrap();
        assert_eq!(logged["event_id"], Value::Null);
        assert_eq!(logged["event_type"], Value::Null);
        assert_eq!(logged["user"], Value::Null);
        assert_eq!(logged["message"], json!("Hello Anonymous"));
        assert_eq!(logged["kafka_metadata"]["offset"], json!(99));
    }

    #[test]
    fn test_time_request_without_user() {
        let outcome = process_record(&record(Some(r#"{"type": "time_request"}"#)));
        let ProcessOutcome::Processed {
            summary,
            time_request,
        } = outcome
        else {
            panic!("expected processed outcome");
        };

        assert!(time_request);
        assert!(summary.user.is_null());
        assert_eq!(user_label(&summary.user), "null");
    }

    #[test]
    fn test_user_label_rendering() {
        assert_eq!(user_label(&json!("ada")), "ada");
        assert_eq!(user_label(&json!(17)), "17");
        assert_eq!(user_label(&Value::Null), "null");
    }

    #[test]
    fn test_time_request_gets_extra_line() {
        let outcome = process_record(&record(Some(r#"{"type": "time_request", "user": "ada"}"#)));
        assert!(matches!(
            outcome,
            ProcessOutcome::Processed {
                time_request: true,
                ..
            }
        ));
    }
}
