//! Database operations for sizes.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use courtside_core::{SizeId, StoreId};

use super::map_delete_error;
use crate::db::RepositoryError;
use crate::models::{Size, SizeInput};

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SizeRow {
    id: SizeId,
    store_id: StoreId,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SizeRow> for Size {
    fn from(row: SizeRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            name: row.name,
            value: row.value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) const SIZE_COLUMNS: &str = "id, store_id, name, value, created_at, updated_at";

/// Repository for size database operations.
pub struct SizeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SizeRepository<'a> {
    /// Create a new size repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List sizes of a store, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError> {
        let rows = sqlx::query_as::<_, SizeRow>(&format!(
            "SELECT {SIZE_COLUMNS} FROM catalog.size \
             WHERE store_id = $1 ORDER BY lower(name) ASC, name COLLATE \"C\" ASC, created_at DESC"
        ))
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a size by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        let row = sqlx::query_as::<_, SizeRow>(&format!(
            "SELECT {SIZE_COLUMNS} FROM catalog.size WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, store: StoreId, input: &SizeInput) -> Result<Size, RepositoryError> {
        let row = sqlx::query_as::<_, SizeRow>(&format!(
            "INSERT INTO catalog.size (id, store_id, name, value) \
             VALUES ($1, $2, $3, $4) RETURNING {SIZE_COLUMNS}"
        ))
        .bind(SizeId::generate())
        .bind(store)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a size's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        store: StoreId,
        id: SizeId,
        input: &SizeInput,
    ) -> Result<Option<Size>, RepositoryError> {
        let row = sqlx::query_as::<_, SizeRow>(&format!(
            "UPDATE catalog.size SET name = $3, value = $4, updated_at = NOW() \
             WHERE id = $1 AND store_id = $2 RETURNING {SIZE_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if products still use it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, store: StoreId, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        let row = sqlx::query_as::<_, SizeRow>(&format!(
            "DELETE FROM catalog.size WHERE id = $1 AND store_id = $2 RETURNING {SIZE_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_delete_error(e, "Size"))?;

        Ok(row.map(Into::into))
    }
}
