//! HTTP handlers

pub mod ingestion;
pub mod panic;
