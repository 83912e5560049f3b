//! Domain entities for item ingestion
//!
//! An item submission arrives as an [`IngestCommand`], may produce a
//! [`StoredImage`] in the content bucket, and ends up as a [`NewItem`]
//! handed to the structured store.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ingestion::ids::ImageToken;

/// Content type attached to every uploaded image
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Raw fields of one submission, before validation
///
/// Every field is optional here; [`IngestionService::ingest`] decides which
/// ones are required.
///
/// [`IngestionService::ingest`]: crate::ingestion::IngestionService::ingest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestCommand {
    pub user_id: Option<String>,
    pub source_url: Option<String>,
    pub image_base64: Option<String>,
    pub note: Option<String>,
}

/// Lifecycle status of an item
///
/// Ingestion only ever writes `Pending`; the other states are set by the
/// downstream processing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Processed,
    Failed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image that has been written to the content bucket
///
/// Only the ingestion service creates one, and only after the object store
/// acknowledged the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    path: String,
}

impl StoredImage {
    /// Compute the bucket path for an image uploaded by `user_id`
    pub fn path_for(user_id: &str, token: &ImageToken) -> String {
        format!("{}/{}.jpg", user_id, token)
    }

    pub(crate) fn written(path: String) -> Self {
        Self { path }
    }

    /// Path of the object inside the content bucket
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// An item record ready to be inserted
///
/// The status is always `Pending` and the image path can only come from a
/// [`StoredImage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    user_id: String,
    source_url: Option<String>,
    raw_text: Option<String>,
    image_path: Option<String>,
    status: ItemStatus,
}

impl NewItem {
    pub fn new(
        user_id: String,
        source_url: Option<String>,
        raw_text: Option<String>,
        image: Option<&StoredImage>,
    ) -> Self {
        Self {
            user_id,
            source_url,
            raw_text,
            image_path: image.map(|image| image.path().to_string()),
            status: ItemStatus::Pending,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Free-text note submitted with the item
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_path_layout() {
        let token = ImageToken::new();
        let path = StoredImage::path_for("user-42", &token);

        assert_eq!(path, format!("user-42/{}.jpg", token));
    }

    #[test]
    fn test_new_item_without_image() {
        let item = NewItem::new("user-1".to_string(), None, Some("a note".to_string()), None);

        assert_eq!(item.user_id(), "user-1");
        assert_eq!(item.raw_text(), Some("a note"));
        assert!(item.source_url().is_none());
        assert!(item.image_path().is_none());
        assert_eq!(item.status(), ItemStatus::Pending);
    }

    #[test]
    fn test_new_item_takes_path_from_stored_image() {
        let image = StoredImage::written("user-1/abc.jpg".to_string());
        let item = NewItem::new(
            "user-1".to_string(),
            Some("https://example.com".to_string()),
            None,
            Some(&image),
        );

        assert_eq!(item.image_path(), Some("user-1/abc.jpg"));
        assert_eq!(item.source_url(), Some("https://example.com"));
        assert_eq!(item.status().as_str(), "pending");
    }

    #[test]
    fn test_status_rendering() {
        assert_eq!(ItemStatus::Pending.to_string(), "pending");
        assert_eq!(ItemStatus::Processed.to_string(), "processed");
        assert_eq!(ItemStatus::Failed.to_string(), "failed");
    }
}
