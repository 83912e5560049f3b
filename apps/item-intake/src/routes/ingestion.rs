//! Ingestion routes

use axum::{routing::post, Router};
use itemdrop_domain::ingestion::IngestionServicePort;

use crate::{
    handlers::ingestion::{ingest_handler, method_not_allowed},
    AppState,
};

/// Create ingestion routes
pub fn routes<S>() -> Router<AppState<S>>
where
    S: IngestionServicePort + 'static,
{
    Router::new().route(
        "/api/ingest",
        post(ingest_handler::<S>).fallback(method_not_allowed),
    )
}
