//! Port trait for the Ingestion Service
//!
//! The HTTP layer depends on this trait rather than on the concrete
//! `IngestionService<O, R>`, so it can be driven by any implementation.

use std::future::Future;

use crate::ingestion::{entity::IngestCommand, error::IngestionError, ids::ItemId};

/// Port trait for ingestion operations
pub trait IngestionServicePort: Send + Sync {
    /// Validate a submission, store its image if any, and insert the item
    ///
    /// # Errors
    ///
    /// - `IngestionError::MissingUserId` if `user_id` is absent or empty
    /// - `IngestionError::InvalidImage` if `image_base64` is not valid base64
    /// - `IngestionError::ImageTooLarge` if the decoded image exceeds the limit
    /// - `IngestionError::UploadFailed` if the object store write fails
    /// - `IngestionError::InsertFailed` if the item insert fails
    fn ingest(
        &self,
        command: IngestCommand,
    ) -> impl Future<Output = Result<ItemId, IngestionError>> + Send;
}
