//! Database operations for billboards.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use courtside_core::{BillboardId, StoreId};

use super::map_delete_error;
use crate::db::RepositoryError;
use crate::models::{Billboard, BillboardInput};

/// Internal row type for billboard queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct BillboardRow {
    id: BillboardId,
    store_id: StoreId,
    label: String,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BillboardRow> for Billboard {
    fn from(row: BillboardRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            label: row.label,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) const BILLBOARD_COLUMNS: &str =
    "id, store_id, label, image_url, created_at, updated_at";

/// Repository for billboard database operations.
pub struct BillboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BillboardRepository<'a> {
    /// Create a new billboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List billboards of a store, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        let rows = sqlx::query_as::<_, BillboardRow>(&format!(
            "SELECT {BILLBOARD_COLUMNS} FROM catalog.billboard \
             WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a billboard by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BillboardId) -> Result<Option<Billboard>, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(&format!(
            "SELECT {BILLBOARD_COLUMNS} FROM catalog.billboard WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        store: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(&format!(
            "INSERT INTO catalog.billboard (id, store_id, label, image_url) \
             VALUES ($1, $2, $3, $4) RETURNING {BILLBOARD_COLUMNS}"
        ))
        .bind(BillboardId::generate())
        .bind(store)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a billboard's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        store: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(&format!(
            "UPDATE catalog.billboard SET label = $3, image_url = $4, updated_at = NOW() \
             WHERE id = $1 AND store_id = $2 RETURNING {BILLBOARD_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if a category or team still shows it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(&format!(
            "DELETE FROM catalog.billboard WHERE id = $1 AND store_id = $2 \
             RETURNING {BILLBOARD_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_delete_error(e, "Billboard"))?;

        Ok(row.map(Into::into))
    }

    /// Number of categories and teams that show this billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn usage_count(&self, id: BillboardId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT
                (SELECT COUNT(*) FROM catalog.category WHERE billboard_id = $1)
              + (SELECT COUNT(*) FROM catalog.team WHERE billboard_id = $1)
            ",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
