//! Item Intake - Stateless ingestion service
//!
//! HTTP front for ItemDrop: accepts item submissions, stores attached images
//! in the content bucket and records items as `pending`.

pub mod config;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

use itemdrop_domain::ingestion::IngestionServicePort;

/// Application state shared across handlers
///
/// Generic over the ingestion service so tests can run the real router
/// against in-memory backends.
pub struct AppState<S> {
    pub ingestion_service: Arc<S>,
}

impl<S> AppState<S>
where
    S: IngestionServicePort,
{
    pub fn new(ingestion_service: S) -> Self {
        Self {
            ingestion_service: Arc::new(ingestion_service),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            ingestion_service: Arc::clone(&self.ingestion_service),
        }
    }
}
