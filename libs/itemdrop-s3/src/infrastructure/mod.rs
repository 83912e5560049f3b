mod s3_object_store;

pub use s3_object_store::{build_client, S3ObjectStore, StorageCredentials};
