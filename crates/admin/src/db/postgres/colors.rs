//! Database operations for colors.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use courtside_core::{ColorId, StoreId};

use super::map_delete_error;
use crate::db::RepositoryError;
use crate::models::{Color, ColorInput};

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ColorRow {
    id: ColorId,
    store_id: StoreId,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ColorRow> for Color {
    fn from(row: ColorRow) -> Self {
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

pub(super) const COLOR_COLUMNS: &str = "id, store_id, name, value, created_at, updated_at";

/// Repository for color database operations.
pub struct ColorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ColorRepository<'a> {
    /// Create a new color repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List colors of a store, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError> {
        let rows = sqlx::query_as::<_, ColorRow>(&format!(
            "SELECT {COLOR_COLUMNS} FROM catalog.color \
             WHERE store_id = $1 ORDER BY lower(name) ASC, name COLLATE \"C\" ASC, created_at DESC"
        ))
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a color by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ColorId) -> Result<Option<Color>, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(&format!(
            "SELECT {COLOR_COLUMNS} FROM catalog.color WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        store: StoreId,
        input: &ColorInput,
    ) -> Result<Color, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(&format!(
            "INSERT INTO catalog.color (id, store_id, name, value) \
             VALUES ($1, $2, $3, $4) RETURNING {COLOR_COLUMNS}"
        ))
        .bind(ColorId::generate())
        .bind(store)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a color's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        store: StoreId,
        id: ColorId,
        input: &ColorInput,
    ) -> Result<Option<Color>, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(&format!(
            "UPDATE catalog.color SET name = $3, value = $4, updated_at = NOW() \
             WHERE id = $1 AND store_id = $2 RETURNING {COLOR_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if products or teams still use it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(
        &self,
        store: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(&format!(
            "DELETE FROM catalog.color WHERE id = $1 AND store_id = $2 RETURNING {COLOR_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_delete_error(e, "Color"))?;

        Ok(row.map(Into::into))
    }

    /// Number of products and team color slots that use this color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn usage_count(&self, id: ColorId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT
                (SELECT COUNT(*) FROM catalog.product WHERE color_id = $1)
              + (SELECT COUNT(*) FROM catalog.team
                 WHERE primary_color_id = $1 OR secondary_color_id = $1)
            ",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
