use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use hysio_core::config::limit_from_env_value;
use hysio_core::constants::{DEFAULT_PAGE_LIMIT, DEFAULT_REST_ADDR, MAX_BATCH_CODES, MAX_PAGE_LIMIT};
use hysio_core::CoreConfig;

/// Main entry point for the Hysio application
///
/// Serves the REST API (with Swagger UI at `/swagger-ui`).
///
/// # Environment Variables
/// - `HYSIO_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `HYSIO_PAGE_LIMIT`: default page size for listings (default: 20)
/// - `HYSIO_MAX_PAGE_LIMIT`: largest page size a client may request (default: 100)
/// - `HYSIO_MAX_BATCH_CODES`: most codes accepted in one validation batch (default: 100)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a limit variable is not a valid number or the limits are inconsistent,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hysio=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("HYSIO_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = Arc::new(CoreConfig::new(
        limit_from_env_value(
            "HYSIO_PAGE_LIMIT",
            std::env::var("HYSIO_PAGE_LIMIT").ok(),
            DEFAULT_PAGE_LIMIT,
        )?,
        limit_from_env_value(
            "HYSIO_MAX_PAGE_LIMIT",
            std::env::var("HYSIO_MAX_PAGE_LIMIT").ok(),
            MAX_PAGE_LIMIT,
        )?,
        limit_from_env_value(
            "HYSIO_MAX_BATCH_CODES",
            std::env::var("HYSIO_MAX_BATCH_CODES").ok(),
            MAX_BATCH_CODES,
        )?,
    )?);

    tracing::info!("++ Starting Hysio REST on {}", rest_addr);

    let app = api_rest::router(AppState::in_memory(cfg));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
