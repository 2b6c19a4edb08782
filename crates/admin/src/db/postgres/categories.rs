//! Database operations for categories.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use courtside_core::{BillboardId, CategoryId, StoreId};

use super::billboards::BillboardRepository;
use super::map_delete_error;
use crate::db::RepositoryError;
use crate::models::{Category, CategoryInput, CategoryWithBillboard};

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct CategoryRow {
    id: CategoryId,
    store_id: StoreId,
    billboard_id: BillboardId,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            billboard_id: row.billboard_id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) const CATEGORY_COLUMNS: &str =
    "id, store_id, billboard_id, name, created_at, updated_at";

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List categories of a store, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM catalog.category \
             WHERE store_id = $1 ORDER BY lower(name) ASC, name COLLATE \"C\" ASC, created_at DESC"
        ))
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category and the billboard it shows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the billboard row is
    /// missing despite the foreign key.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        id: CategoryId,
    ) -> Result<Option<CategoryWithBillboard>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM catalog.category WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let category = Category::from(row);
        let billboard = BillboardRepository::new(self.pool)
            .get(category.billboard_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "category {} references missing billboard {}",
                    category.id, category.billboard_id
                ))
            })?;

        Ok(Some(CategoryWithBillboard {
            category,
            billboard,
        }))
    }

    /// Insert a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        store: StoreId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "INSERT INTO catalog.category (id, store_id, billboard_id, name) \
             VALUES ($1, $2, $3, $4) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(CategoryId::generate())
        .bind(store)
        .bind(input.billboard_id)
        .bind(&input.name)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a category's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        store: StoreId,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "UPDATE catalog.category SET name = $3, billboard_id = $4, updated_at = NOW() \
             WHERE id = $1 AND store_id = $2 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .bind(&input.name)
        .bind(input.billboard_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if products are still listed under it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "DELETE FROM catalog.category WHERE id = $1 AND store_id = $2 \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_delete_error(e, "Category"))?;

        Ok(row.map(Into::into))
    }
}
