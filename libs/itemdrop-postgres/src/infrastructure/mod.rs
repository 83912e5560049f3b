mod pg_item_repository;

pub use pg_item_repository::{connect, PgItemRepository, MIGRATOR};
