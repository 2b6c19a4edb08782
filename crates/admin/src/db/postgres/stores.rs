//! Database operations for stores.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use courtside_core::{StoreId, UserId};

use super::map_delete_error;
use crate::db::RepositoryError;
use crate::models::Store;

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    name: String,
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const STORE_COLUMNS: &str = "id, name, user_id, created_at, updated_at";

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a store owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, owner: &UserId, name: &str) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "INSERT INTO catalog.store (id, name, user_id) VALUES ($1, $2, $3) \
             RETURNING {STORE_COLUMNS}"
        ))
        .bind(StoreId::generate())
        .bind(name)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a store by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM catalog.store WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List stores owned by `owner`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM catalog.store \
             WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Rename a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn rename(&self, id: StoreId, name: &str) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "UPDATE catalog.store SET name = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {STORE_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if catalog rows still belong to the
    /// store (RESTRICT foreign keys).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "DELETE FROM catalog.store WHERE id = $1 RETURNING {STORE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_delete_error(e, "Store"))?;

        Ok(row.map(Into::into))
    }

    /// Number of catalog and order rows that belong to the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn child_count(&self, id: StoreId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT
                (SELECT COUNT(*) FROM catalog.billboard WHERE store_id = $1)
              + (SELECT COUNT(*) FROM catalog.category WHERE store_id = $1)
              + (SELECT COUNT(*) FROM catalog.size WHERE store_id = $1)
              + (SELECT COUNT(*) FROM catalog.color WHERE store_id = $1)
              + (SELECT COUNT(*) FROM catalog.team WHERE store_id = $1)
              + (SELECT COUNT(*) FROM catalog.product WHERE store_id = $1)
              + (SELECT COUNT(*) FROM catalog.customer_order WHERE store_id = $1)
            ",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
