//! Domain errors for ingestion operations
//!
//! These are domain-level errors that abstract away infrastructure details.
//! Backend failures keep the backend's message verbatim so the HTTP layer can
//! pass it through.

use thiserror::Error;

/// Errors that can occur while ingesting an item
#[derive(Error, Debug)]
pub enum IngestionError {
    /// The submission has no usable `user_id`
    #[error("missing user_id")]
    MissingUserId,

    /// `image_base64` could not be decoded into image bytes
    #[error("invalid image_base64: {0}")]
    InvalidImage(String),

    /// The decoded image is larger than the configured maximum
    #[error("image of {size} bytes exceeds maximum of {max} bytes")]
    ImageTooLarge { size: usize, max: usize },

    /// The object store rejected or failed the upload
    #[error("{0}")]
    UploadFailed(String),

    /// The structured store rejected or failed the insert
    #[error("{0}")]
    InsertFailed(String),
}

impl IngestionError {
    /// Create an invalid image error with a message
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    /// Create an image too large error
    pub fn image_too_large(size: usize, max: usize) -> Self {
        Self::ImageTooLarge { size, max }
    }

    /// Create an upload failure error with a message
    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    /// Create an insert failure error with a message
    pub fn insert_failed(msg: impl Into<String>) -> Self {
        Self::InsertFailed(msg.into())
    }

    /// Whether the error was caused by the submission itself
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingUserId | Self::InvalidImage(_) | Self::ImageTooLarge { .. }
        )
    }
}
