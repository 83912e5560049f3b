//! # ItemDrop S3 Adapter
//!
//! Implements the domain's `ObjectStore` port on top of any S3-compatible
//! service (AWS S3, MinIO, Supabase Storage's S3 endpoint).

pub mod infrastructure;
