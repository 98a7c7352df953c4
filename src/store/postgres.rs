use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use uuid::Uuid;

use super::{assign_id, Collection, DocumentStore};
use crate::error::AppError;
use crate::models::Document;

/// Document store backed by one JSONB table per collection.
///
/// Filters are evaluated with JSONB containment (`doc @> filter`); `seq`
/// preserves insertion order.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Opens the connection pool and applies pending migrations.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("connected to document database");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Waits for in-flight queries and closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        log::info!("document database connection closed");
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Document,
    ) -> Result<Option<Document>, AppError> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc @> $1 ORDER BY seq LIMIT 1",
            collection.name()
        );
        let document = sqlx::query_scalar::<_, Json<Document>>(&sql)
            .bind(Json(filter))
            .fetch_optional(&self.pool)
            .await?;
        Ok(document.map(|Json(doc)| doc))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Document,
    ) -> Result<Vec<Document>, AppError> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc @> $1 ORDER BY seq",
            collection.name()
        );
        let documents = sqlx::query_scalar::<_, Json<Document>>(&sql)
            .bind(Json(filter))
            .fetch_all(&self.pool)
            .await?;
        Ok(documents.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<Uuid, AppError> {
        let id = assign_id(&mut document);
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.name());
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(&document))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }
}
