//! Ports (trait definitions) for external dependencies
//!
//! This module defines the contracts (ports) that external adapters must implement.
//! Following hexagonal architecture, the domain defines what it needs, and the
//! infrastructure provides implementations.
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait` to ensure zero-cost abstractions and static dispatch.

use std::future::Future;

use crate::ingestion::{entity::NewItem, error::IngestionError, ids::ItemId};

/// Port for the content bucket holding uploaded images
///
/// Implementations write each object once. There is no read, overwrite or
/// delete path: the ingestion flow never touches an object after writing it.
pub trait ObjectStore: Send + Sync {
    /// Write `data` at `path` tagged with `content_type`
    ///
    /// # Errors
    ///
    /// Returns `IngestionError::UploadFailed` carrying the backend's message
    /// if the write did not happen.
    fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), IngestionError>> + Send;
}

/// Port for the structured store holding item records
pub trait ItemRepository: Send + Sync {
    /// Insert a new item and return the identifier assigned by the store
    ///
    /// # Errors
    ///
    /// Returns `IngestionError::InsertFailed` carrying the backend's message
    /// if the row was not inserted.
    fn insert(&self, item: &NewItem) -> impl Future<Output = Result<ItemId, IngestionError>> + Send;
}
