//! Ingestion service - Business logic orchestration
//!
//! This module contains the core business logic for item ingestion.
//! The service validates a submission, writes its image to the object store,
//! and records the item through the repository port, strictly in that order.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use tracing::{debug, info, instrument, warn};

use super::{
    ports::IngestionServicePort, ImageToken, IngestCommand, IngestionError, ItemId, NewItem,
    StoredImage, IMAGE_CONTENT_TYPE,
};
use crate::ports::{ItemRepository, ObjectStore};

/// Standard alphabet, optional padding, non-canonical trailing bits accepted
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Configuration for the ingestion service
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Maximum decoded image size in bytes (default: 10MB)
    pub max_image_bytes: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Service for ingesting user-submitted items
///
/// This service encapsulates the business rules for ingestion:
/// - `user_id` is the only required field
/// - An attached image is decoded, size-checked and uploaded before the insert
/// - The inserted item always starts out as `pending`
/// - Nothing is retried and an uploaded image is never rolled back
///
/// ## Static Dispatch
///
/// The service is generic over the `ObjectStore` and `ItemRepository` ports.
/// Backend clients are built once by the caller and moved in here, which is
/// also how tests substitute in-memory fakes.
pub struct IngestionService<O, R> {
    store: O,
    repository: R,
    config: IngestionConfig,
}

impl<O, R> IngestionService<O, R>
where
    O: ObjectStore,
    R: ItemRepository,
{
    /// Create a new IngestionService with the given ports and configuration
    pub fn new(store: O, repository: R, config: IngestionConfig) -> Self {
        Self {
            store,
            repository,
            config,
        }
    }

    /// Create a new IngestionService with default configuration
    pub fn with_backends(store: O, repository: R) -> Self {
        Self::new(store, repository, IngestionConfig::default())
    }

    /// Ingest one submission and return the new item's identifier
    ///
    /// 1. Rejects a missing or empty `user_id`
    /// 2. If `image_base64` is non-empty, decodes it and uploads it to
    ///    `{user_id}/{token}.jpg`
    /// 3. Inserts the item with status `pending`
    ///
    /// # Errors
    ///
    /// See [`IngestionServicePort::ingest`]. Upload failures short-circuit
    /// before the insert is attempted.
    #[instrument(skip(self, command), fields(user_id = tracing::field::Empty))]
    pub async fn ingest(&self, command: IngestCommand) -> Result<ItemId, IngestionError> {
        let IngestCommand {
            user_id,
            source_url,
            image_base64,
            note,
        } = command;

        // Business rule: user_id is required and must not be empty
        let user_id = match user_id {
            Some(user_id) if !user_id.is_empty() => user_id,
            _ => {
                debug!("Rejecting submission without user_id");
                return Err(IngestionError::MissingUserId);
            }
        };
        tracing::Span::current().record("user_id", user_id.as_str());

        let image = match image_base64.as_deref().filter(|encoded| !encoded.is_empty()) {
            Some(encoded) => Some(self.store_image(&user_id, encoded).await?),
            None => None,
        };

        let item = NewItem::new(user_id, source_url, note, image.as_ref());
        let item_id = self.repository.insert(&item).await?;

        info!(
            item_id = %item_id,
            image_path = item.image_path().unwrap_or_default(),
            "Item ingested"
        );
        Ok(item_id)
    }

    async fn store_image(
        &self,
        user_id: &str,
        encoded: &str,
    ) -> Result<StoredImage, IngestionError> {
        let data = decode_image(encoded, self.config.max_image_bytes)?;
        let size = data.len();
        let path = StoredImage::path_for(user_id, &ImageToken::new());

        debug!(path = %path, size, "Uploading item image");
        self.store.upload(&path, data, IMAGE_CONTENT_TYPE).await?;

        Ok(StoredImage::written(path))
    }
}

impl<O, R> IngestionServicePort for IngestionService<O, R>
where
    O: ObjectStore,
    R: ItemRepository,
{
    fn ingest(
        &self,
        command: IngestCommand,
    ) -> impl std::future::Future<Output = Result<ItemId, IngestionError>> + Send {
        IngestionService::ingest(self, command)
    }
}

/// Decode a base64 image payload, ignoring embedded ASCII whitespace
fn decode_image(encoded: &str, max_bytes: usize) -> Result<Vec<u8>, IngestionError> {
    let cleaned: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    let data = LENIENT_BASE64.decode(&cleaned).map_err(|err| {
        warn!(error = %err, "Rejecting malformed image_base64");
        IngestionError::invalid_image(err.to_string())
    })?;

    if data.is_empty() {
        return Err(IngestionError::invalid_image("decoded image is empty"));
    }

    if data.len() > max_bytes {
        return Err(IngestionError::image_too_large(data.len(), max_bytes));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::ItemStatus;
    use crate::testing::{InMemoryItemRepository, InMemoryObjectStore};

    // "\xFF\xD8\xFF\xE0" - a JPEG SOI marker followed by APP0
    const JPEG_HEADER_B64: &str = "/9j/4A==";

    fn service() -> (
        IngestionService<InMemoryObjectStore, InMemoryItemRepository>,
        InMemoryObjectStore,
        InMemoryItemRepository,
    ) {
        let store = InMemoryObjectStore::new();
        let repository = InMemoryItemRepository::new();
        let service = IngestionService::with_backends(store.clone(), repository.clone());
        (service, store, repository)
    }

    fn command(user_id: Option<&str>) -> IngestCommand {
        IngestCommand {
            user_id: user_id.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ingest_without_image() {
        let (service, store, repository) = service();

        let cmd = IngestCommand {
            note: Some("buy milk".to_string()),
            source_url: Some("https://example.com/post".to_string()),
            ..command(Some("user-1"))
        };
        let item_id = service.ingest(cmd).await.unwrap();

        assert!(store.uploads().is_empty());
        let items = repository.inserted();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0, item_id);
        assert_eq!(items[0].1.user_id(), "user-1");
        assert_eq!(items[0].1.raw_text(), Some("buy milk"));
        assert_eq!(items[0].1.source_url(), Some("https://example.com/post"));
        assert!(items[0].1.image_path().is_none());
        assert_eq!(items[0].1.status(), ItemStatus::Pending);
    }

    #[tokio::test]
    async fn test_missing_user_id_fails_without_backend_calls() {
        let (service, store, repository) = service();

        for cmd in [
            command(None),
            command(Some("")),
            IngestCommand {
                image_base64: Some(JPEG_HEADER_B64.to_string()),
                ..command(None)
            },
        ] {
            let result = service.ingest(cmd).await;
            assert!(matches!(result, Err(IngestionError::MissingUserId)));
        }

        assert!(store.uploads().is_empty());
        assert!(repository.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_with_image_uploads_once_and_links_path() {
        let (service, store, repository) = service();

        let cmd = IngestCommand {
            image_base64: Some(JPEG_HEADER_B64.to_string()),
            ..command(Some("user-7"))
        };
        service.ingest(cmd).await.unwrap();

        let uploads = store.uploads();
        assert_eq!(uploads.len(), 1);
        let upload = &uploads[0];
        assert_eq!(upload.data, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(upload.content_type, "image/jpeg");

        let token = upload
            .path
            .strip_prefix("user-7/")
            .and_then(|rest| rest.strip_suffix(".jpg"))
            .expect("path should be {user_id}/{token}.jpg");
        assert_eq!(token.len(), 32);

        let items = repository.inserted();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].1.image_path(), Some(upload.path.as_str()));
    }

    #[tokio::test]
    async fn test_empty_image_is_treated_as_absent() {
        let (service, store, repository) = service();

        let cmd = IngestCommand {
            image_base64: Some(String::new()),
            ..command(Some("user-1"))
        };
        service.ingest(cmd).await.unwrap();

        assert!(store.uploads().is_empty());
        assert!(repository.inserted()[0].1.image_path().is_none());
    }

    #[tokio::test]
    async fn test_malformed_image_fails_without_backend_calls() {
        let (service, store, repository) = service();

        let cmd = IngestCommand {
            image_base64: Some("not*base64!".to_string()),
            ..command(Some("user-1"))
        };
        let result = service.ingest(cmd).await;

        assert!(matches!(result, Err(IngestionError::InvalidImage(_))));
        assert!(store.uploads().is_empty());
        assert!(repository.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_too_large_image_fails_without_backend_calls() {
        let store = InMemoryObjectStore::new();
        let repository = InMemoryItemRepository::new();
        let config = IngestionConfig { max_image_bytes: 2 };
        let service = IngestionService::new(store.clone(), repository.clone(), config);

        let cmd = IngestCommand {
            image_base64: Some(JPEG_HEADER_B64.to_string()),
            ..command(Some("user-1"))
        };
        let result = service.ingest(cmd).await;

        assert!(matches!(
            result,
            Err(IngestionError::ImageTooLarge { size: 4, max: 2 })
        ));
        assert!(store.uploads().is_empty());
        assert!(repository.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_skips_insert() {
        let store = InMemoryObjectStore::failing("bucket item-images not found");
        let repository = InMemoryItemRepository::new();
        let service = IngestionService::with_backends(store.clone(), repository.clone());

        let cmd = IngestCommand {
            image_base64: Some(JPEG_HEADER_B64.to_string()),
            ..command(Some("user-1"))
        };
        let err = service.ingest(cmd).await.unwrap_err();

        assert!(matches!(err, IngestionError::UploadFailed(_)));
        assert_eq!(err.to_string(), "bucket item-images not found");
        assert_eq!(store.attempts(), 1);
        assert!(repository.inserted().is_empty());
        assert_eq!(repository.attempts(), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_leaves_upload_in_place() {
        let store = InMemoryObjectStore::new();
        let repository = InMemoryItemRepository::failing("duplicate key value");
        let service = IngestionService::with_backends(store.clone(), repository.clone());

        let cmd = IngestCommand {
            image_base64: Some(JPEG_HEADER_B64.to_string()),
            ..command(Some("user-1"))
        };
        let err = service.ingest(cmd).await.unwrap_err();

        assert!(matches!(err, IngestionError::InsertFailed(_)));
        assert_eq!(err.to_string(), "duplicate key value");
        assert_eq!(store.attempts(), 1);
        assert_eq!(store.uploads().len(), 1);
        assert_eq!(repository.attempts(), 1);
    }

    #[tokio::test]
    async fn test_every_item_starts_pending() {
        let (service, _store, repository) = service();

        let commands = [
            command(Some("a")),
            IngestCommand {
                note: Some("n".to_string()),
                ..command(Some("b"))
            },
            IngestCommand {
                image_base64: Some(JPEG_HEADER_B64.to_string()),
                source_url: Some("https://x".to_string()),
                ..command(Some("c"))
            },
        ];
        for cmd in commands {
            service.ingest(cmd).await.unwrap();
        }

        let items = repository.inserted();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|(_, item)| item.status().as_str() == "pending"));
    }

    #[test]
    fn test_decode_image_is_lenient_about_layout() {
        // Unpadded and line-wrapped input decode the same bytes
        assert_eq!(decode_image("/9j/4A", 16).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(
            decode_image("/9j/\n4A==\r\n", 16).unwrap(),
            vec![0xFF, 0xD8, 0xFF, 0xE0]
        );
    }

    #[test]
    fn test_decode_image_rejects_whitespace_only() {
        assert!(matches!(
            decode_image("  \n", 16),
            Err(IngestionError::InvalidImage(_))
        ));
    }
}
