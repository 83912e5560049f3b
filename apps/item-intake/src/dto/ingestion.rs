//! DTOs for ingestion endpoints

use itemdrop_domain::ingestion::IngestCommand;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for ingestion endpoint
///
/// All fields are optional at the JSON level so that a missing `user_id`
/// surfaces as a domain error rather than a deserialization error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IngestRequest {
    /// Opaque identifier of the submitting user
    #[schema(example = "3f1c2a9e-user")]
    pub user_id: Option<String>,
    /// Where the item came from
    #[schema(example = "https://example.com/article")]
    pub source_url: Option<String>,
    /// Base64-encoded JPEG image
    #[schema(example = "/9j/4AAQSkZJRg==")]
    pub image_base64: Option<String>,
    /// Free-text note, stored as `raw_text`
    #[schema(example = "Read this later")]
    pub note: Option<String>,
}

impl From<IngestRequest> for IngestCommand {
    fn from(request: IngestRequest) -> Self {
        Self {
            user_id: request.user_id,
            source_url: request.source_url,
            image_base64: request.image_base64,
            note: request.note,
        }
    }
}

/// Response body for successful ingestion
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    #[schema(example = true)]
    pub ok: bool,
    /// Identifier assigned to the new item
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub item_id: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "missing user_id")]
    pub error: String,
}

/// Error response body for failures nobody anticipated
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InternalErrorResponse {
    /// Always `internal_error`
    #[schema(example = "internal_error")]
    pub error: String,
    /// What went wrong
    pub message: String,
}
