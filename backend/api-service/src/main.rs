use actix_middleware::Logging;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use api_service::{handlers, AppState, Config, KafkaEventPublisher};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(&config);
    tracing::info!("Starting api-service");

    let publisher =
        Arc::new(KafkaEventPublisher::new(&config).context("Failed to create Kafka producer")?);
    let state = web::Data::new(AppState::new(publisher.clone()));

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting HTTP server on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logging)
            .configure(handlers::configure)
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run()
    .await?;

    tracing::info!("HTTP server stopped, flushing pending events");
    publisher.flush(Duration::from_secs(10));

    Ok(())
}
