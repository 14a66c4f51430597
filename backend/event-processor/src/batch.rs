//! Batch entry point
//!
//! Runs the processing function over a pre-fetched batch of records grouped
//! by `<topic>-<partition>`, as delivered by serverless Kafka triggers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{error, info};

use crate::processor::{process_record, ProcessOutcome};
use crate::record::BrokerRecord;

/// Raw batch; each record is converted on its own so one bad entry does
/// not discard its neighbours
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchEvent {
    #[serde(default)]
    pub records: BTreeMap<String, Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: i64,
}

impl BatchReport {
    fn failure(error: String) -> Self {
        Self {
            status_code: 500,
            processed: 0,
            skipped: 0,
            failed: 0,
            error: Some(error),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Process every record of every group in order.
///
/// `failed` counts records that are not valid broker records or whose value
/// is not a JSON object; `skipped` counts empty values.
pub fn process_batch(event: &BatchEvent) -> BatchReport {
    let mut report = BatchReport {
        status_code: 200,
        processed: 0,
        skipped: 0,
        failed: 0,
        error: None,
        timestamp: 0,
    };

    let records = event
        .records
        .iter()
        .flat_map(|(group, raw)| raw.iter().map(move |record| (group, record)));

    for (group, raw) in records {
        let record = match BrokerRecord::deserialize(raw) {
            Ok(record) => record,
            Err(e) => {
                error!(group = %group, "Failed to process record: {}", e);
                report.failed += 1;
                continue;
            }
        };

        match process_record(&record) {
            ProcessOutcome::Processed { .. } => report.processed += 1,
            ProcessOutcome::SkippedEmpty => report.skipped += 1,
            ProcessOutcome::SkippedMalformed => report.failed += 1,
        }
    }

    report.timestamp = chrono::Utc::now().timestamp();
    info!(
        "Batch processing complete: {}",
        serde_json::to_string(&report).unwrap_or_default()
    );
    report
}

/// Parse a raw batch and process it; an unparseable batch yields a 500 report
pub fn handle_batch_payload(raw: &str) -> BatchReport {
    match serde_json::from_str::<BatchEvent>(raw) {
        Ok(event) => process_batch(&event),
        Err(e) => {
            error!("Batch execution error: {}", e);
            BatchReport::failure(e.to_string())
        }
    }
}
