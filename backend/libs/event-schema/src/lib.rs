/// Event schemas shared by the time-events API service and event processor.
///
/// The producer writes [`TimeEvent`] records; the processor reads any JSON
/// object as an [`EventPayload`] without enforcing a schema.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Topic and event type names
pub mod topics {
    /// Default topic for published events
    pub const EVENTS: &str = "events";

    /// Event type that receives an extra log line in the processor
    pub const TIME_REQUEST: &str = "time_request";
}

/// Event published by `/current_time`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEvent {
    pub timestamp: i64,
    pub message: String,
    pub name: String,
}

impl TimeEvent {
    pub fn new(name: impl Into<String>, timestamp: i64) -> Self {
        let name = name.into();
        Self {
            timestamp,
            message: greeting(&name),
            name,
        }
    }

    /// Partition key, `time_{timestamp}`
    pub fn key(&self) -> String {
        format!("time_{}", self.timestamp)
    }
}

/// Greeting text shared by the HTTP response and the published event
pub fn greeting(name: &str) -> String {
    format!("Hello {}", name)
}

/// Loosely-typed event read off the broker.
///
/// Every field is optional and may hold any JSON value; absent fields read
/// as `null`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub id: Value,
    #[serde(default, rename = "type")]
    pub event_type: Value,
    #[serde(default)]
    pub user: Value,
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub timestamp: Value,
}

impl EventPayload {
    pub fn is_type(&self, event_type: &str) -> bool {
        self.event_type.as_str() == Some(event_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_event_key_and_message() {
        let event = TimeEvent::new("Ada", 1_700_000_000);
        assert_eq!(event.key(), "time_1700000000");
        assert_eq!(event.message, "Hello Ada");
        assert_eq!(event.name, "Ada");
    }

    #[test]
    fn test_time_event_wire_shape() {
        let event = TimeEvent::new("Anonymous", 42);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"timestamp": 42, "message": "Hello Anonymous", "name": "Anonymous"})
        );
    }

    #[test]
    fn test_payload_missing_fields_are_null() {
        let payload: EventPayload = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(payload.message, json!("hi"));
        assert!(payload.id.is_null());
        assert!(payload.event_type.is_null());
        assert!(payload.user.is_null());
        assert!(payload.timestamp.is_null());
    }

    #[test]
    fn test_payload_type_match() {
        let payload: EventPayload =
            serde_json::from_value(json!({"type": "time_request", "extra": [1, 2]})).unwrap();
        assert!(payload.is_type(topics::TIME_REQUEST));

        let numeric: EventPayload = serde_json::from_value(json!({"type": 7})).unwrap();
        assert!(!numeric.is_type(topics::TIME_REQUEST));
    }
}
