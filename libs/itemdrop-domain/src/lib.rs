//! # ItemDrop Domain Layer
//!
//! This crate contains the pure business logic and domain models for ItemDrop
//! item ingestion. It follows hexagonal architecture principles:
//!
//! - **Entities**: Core domain models (NewItem, StoredImage)
//! - **Ports**: Trait definitions for external dependencies (ObjectStore, ItemRepository)
//! - **Services**: Business logic orchestration (IngestionService)
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (AWS, SQL, HTTP, etc.).
//! All external dependencies are expressed as traits (ports) that are implemented
//! by adapter layers.
//!
//! ## Example
//!
//! ```rust
//! use itemdrop_domain::ingestion::{IngestCommand, IngestionService};
//! use itemdrop_domain::ports::{ItemRepository, ObjectStore};
//!
//! async fn example<O: ObjectStore, R: ItemRepository>(service: IngestionService<O, R>) {
//!     let command = IngestCommand {
//!         user_id: Some("user-1".to_string()),
//!         note: Some("remember this".to_string()),
//!         ..Default::default()
//!     };
//!     let item_id = service.ingest(command).await.unwrap();
//!     println!("Ingested item: {}", item_id);
//! }
//! ```

pub mod ingestion;
pub mod ports;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use ingestion::{IngestCommand, IngestionError, IngestionService, ItemId, NewItem};
pub use ports::{ItemRepository, ObjectStore};
