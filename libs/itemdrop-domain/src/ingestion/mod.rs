//! Ingestion domain module
//!
//! This module contains the core business logic and entities for item ingestion.
//! It defines what an item submission is and how it flows from the request to
//! the content bucket and the item table.

pub mod entity;
pub mod error;
pub mod ids;
pub mod ports;
pub mod service;

pub use entity::{IngestCommand, ItemStatus, NewItem, StoredImage, IMAGE_CONTENT_TYPE};
pub use error::IngestionError;
pub use ids::{ImageToken, ItemId};
pub use ports::IngestionServicePort;
pub use service::{IngestionConfig, IngestionService};
