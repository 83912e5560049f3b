//! PostgreSQL Item Repository Implementation
//!
//! This module implements the `ItemRepository` trait with a single
//! `INSERT ... RETURNING id` against the `items` table.

use itemdrop_domain::{
    ingestion::{IngestionError, ItemId, NewItem},
    ports::ItemRepository,
};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Embedded migrations for the `items` table
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const INSERT_ITEM: &str = r#"
    INSERT INTO items (user_id, source_url, raw_text, image_path, status)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id
"#;

/// Open a connection pool to the structured store
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    info!(max_connections, "Connected to PostgreSQL");
    Ok(pool)
}

/// PostgreSQL-based implementation of the ItemRepository port
///
/// Holds a shared `PgPool`; cloning the repository clones the pool handle,
/// not the connections.
#[derive(Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ItemRepository for PgItemRepository {
    #[instrument(skip(self, item), fields(user_id = %item.user_id(), has_image = item.image_path().is_some()))]
    fn insert(
        &self,
        item: &NewItem,
    ) -> impl std::future::Future<Output = Result<ItemId, IngestionError>> + Send {
        let pool = self.pool.clone();
        let item = item.clone();

        async move {
            debug!("Inserting item");

            match sqlx::query_scalar::<_, Uuid>(INSERT_ITEM)
                .bind(item.user_id())
                .bind(item.source_url())
                .bind(item.raw_text())
                .bind(item.image_path())
                .bind(item.status().as_str())
                .fetch_one(&pool)
                .await
            {
                Ok(id) => {
                    info!(item_id = %id, "Successfully inserted item");
                    Ok(ItemId::from_uuid(id))
                }
                Err(err) => {
                    error!(error = ?err, "Failed to insert item");
                    Err(IngestionError::insert_failed(insert_error_message(&err)))
                }
            }
        }
    }
}

/// Prefer the database's own message over sqlx's "error returned from database:" wrapper
fn insert_error_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}
