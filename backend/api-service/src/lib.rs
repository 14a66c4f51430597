pub mod config;
pub mod error;
pub mod handlers;
pub mod kafka;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, Result};
pub use kafka::{EventPublisher, KafkaEventPublisher, PublishError};

/// Shared state handed to every actix worker
#[derive(Clone)]
pub struct AppState {
    pub publisher: Arc<dyn EventPublisher>,
}

impl AppState {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }
}
