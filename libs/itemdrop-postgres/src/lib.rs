//! # ItemDrop PostgreSQL Adapter
//!
//! Implements the domain's `ItemRepository` port with `sqlx` and ships the
//! `items` table migration.

pub mod infrastructure;

pub use infrastructure::{connect, PgItemRepository, MIGRATOR};
