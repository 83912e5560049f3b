//! Request and response bodies

pub mod ingestion;
