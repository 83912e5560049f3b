//! S3 Object Store Implementation
//!
//! This module implements the `ObjectStore` trait using AWS S3 as the backend.
//! It handles the `put_object` call and converts AWS errors to domain errors.

use aws_sdk_s3::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    Client,
};
use aws_config::retry::RetryConfig;
use bytes::Bytes;
use itemdrop_domain::{ingestion::IngestionError, ports::ObjectStore};
use tracing::{debug, error, info, instrument};

/// Connection settings for an S3-compatible endpoint
#[derive(Clone)]
pub struct StorageCredentials {
    /// Base URL of the storage endpoint
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Build an S3 client for the given endpoint
///
/// Uses static service credentials and path-style addressing, which is what
/// MinIO and other self-hosted S3 endpoints expect. SDK retries are disabled:
/// each upload reaches the endpoint at most once.
pub async fn build_client(credentials: &StorageCredentials) -> Client {
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .endpoint_url(&credentials.endpoint)
        .region(Region::new(credentials.region.clone()))
        .credentials_provider(Credentials::new(
            &credentials.access_key_id,
            &credentials.secret_access_key,
            None,
            None,
            "itemdrop-static",
        ))
        .retry_config(RetryConfig::disabled())
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true) // Required for MinIO
        .build();

    Client::from_conf(s3_config)
}

/// S3-based implementation of the ObjectStore port
///
/// Objects are written under the key the domain chooses
/// (`{user_id}/{token}.jpg`) inside a single content bucket.
///
/// ## Error Handling
///
/// All AWS SDK errors are converted to `IngestionError::UploadFailed` with
/// the full SDK error context as the message.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new S3 object store
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use itemdrop_s3::infrastructure::{build_client, S3ObjectStore, StorageCredentials};
    ///
    /// # async fn example(credentials: StorageCredentials) {
    /// let client = build_client(&credentials).await;
    /// let store = S3ObjectStore::new(client, "item-images".to_string());
    /// # }
    /// ```
    pub fn new(client: Client, bucket: String) -> Self {
        info!(bucket = %bucket, "Initializing S3ObjectStore");
        Self { client, bucket }
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self, data), fields(bucket = %self.bucket))]
    fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<(), IngestionError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = path.to_string();
        let content_type = content_type.to_string();
        let data_size = data.len();
        let body = ByteStream::from(Bytes::from(data));

        async move {
            debug!(key = %key, data_size, "Uploading object to S3");

            match client
                .put_object()
                .bucket(&bucket)
                .key(&key)
                .content_type(content_type)
                .body(body)
                .send()
                .await
            {
                Ok(_) => {
                    info!(key = %key, "Successfully uploaded object to S3");
                    Ok(())
                }
                Err(err) => {
                    error!(key = %key, error = ?err, "Failed to upload object to S3");
                    Err(IngestionError::upload_failed(
                        DisplayErrorContext(&err).to_string(),
                    ))
                }
            }
        }
    }
}
