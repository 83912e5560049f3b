//! Item Intake - Stateless ingestion service
//!
//! Builds the backend clients once, wires them into the ingestion service
//! and serves the HTTP API until interrupted.

use anyhow::{Context, Result};
use item_intake::{config::IntakeConfig, routes, telemetry, AppState};
use itemdrop_domain::ingestion::IngestionService;
use itemdrop_postgres::{connect, PgItemRepository, MIGRATOR};
use itemdrop_s3::infrastructure::{build_client, S3ObjectStore};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Configuration errors abort before tracing exists; anyhow reports them
    let config = IntakeConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    telemetry::init_tracing(config.log_format);

    info!(config = ?config, "Starting item-intake service");

    // Object store for item images
    let s3_client = build_client(&config.storage).await;
    let store = S3ObjectStore::new(s3_client, config.bucket.clone());

    // Structured store for item records
    let pool = connect(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to the database")?;
    if config.run_migrations {
        MIGRATOR
            .run(&pool)
            .await
            .context("failed to run database migrations")?;
        info!("Database migrations applied");
    }
    let repository = PgItemRepository::new(pool);

    let service = IngestionService::new(store, repository, config.ingestion());
    let state = AppState::new(service);

    // Build HTTP router
    let app = routes::create_router(state, config.request_body_limit());

    let addr = config.bind_address();
    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
