/// HTTP handlers for the time-events API
///
/// - GET /hello
/// - GET /current_time?name=...
/// - GET /healthcheck
use actix_web::{web, HttpRequest, HttpResponse};
use event_schema::TimeEvent;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{AppError, AppState, Result};

const DEFAULT_NAME: &str = "Anonymous";

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentTimeResponse {
    pub timestamp: i64,
    pub message: String,
}

/// Register all routes on an actix `ServiceConfig`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/hello", web::get().to(hello))
        .route("/current_time", web::get().to(current_time))
        .route("/healthcheck", web::get().to(healthcheck));
}

/// GET /hello
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Hello World!" }))
}

/// GET /healthcheck
///
/// Reports healthy regardless of broker availability.
pub async fn healthcheck() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

/// First `name` value of a query string; repeated keys do not fail the request
fn query_name(query_string: &str) -> Result<Option<String>> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(query_string).map_err(|e| {
        error!(error = %e, "Failed to parse current_time query");
        AppError::Internal(e.to_string())
    })?;

    Ok(pairs
        .into_inner()
        .into_iter()
        .find(|(key, _)| key == "name")
        .map(|(_, value)| value))
}

/// GET /current_time
///
/// Publishes a `TimeEvent` keyed `time_{timestamp}` and answers with the
/// greeting without waiting for the broker to acknowledge the record.
pub async fn current_time(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let name = query_name(req.query_string())?.unwrap_or_else(|| DEFAULT_NAME.to_string());
    let timestamp = chrono::Utc::now().timestamp();

    let event = TimeEvent::new(name, timestamp);
    let key = event.key();

    state.publisher.publish(&key, &event).await.map_err(|e| {
        error!(error = %e, key = %key, "Error in current_time endpoint");
        e
    })?;

    info!(
        key = %key,
        event = %serde_json::to_string(&event).unwrap_or_default(),
        "Published to Kafka"
    );

    Ok(HttpResponse::Ok().json(CurrentTimeResponse {
        timestamp: event.timestamp,
        message: event.message,
    }))
}
