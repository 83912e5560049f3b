//! API routes

pub mod ingestion;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use itemdrop_domain::ingestion::IngestionServicePort;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::ingestion::{ErrorResponse, IngestRequest, IngestResponse, InternalErrorResponse},
    handlers, AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::ingestion::ingest_handler,
        health_handler
    ),
    components(
        schemas(IngestRequest, IngestResponse, ErrorResponse, InternalErrorResponse)
    ),
    tags(
        (name = "ingestion", description = "Item ingestion endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Item Intake API",
        version = "0.1.0",
        description = "Stateless intake service for ItemDrop item submissions",
        contact(
            name = "ItemDrop Team"
        )
    )
)]
pub struct ApiDoc;

/// Create the main application router
///
/// `max_body_bytes` bounds every request body; panics anywhere below the
/// outermost layer become `500 internal_error` responses.
pub fn create_router<S>(state: AppState<S>, max_body_bytes: usize) -> Router
where
    S: IngestionServicePort + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(ingestion::routes::<S>())
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handlers::panic::handle_panic))
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}
