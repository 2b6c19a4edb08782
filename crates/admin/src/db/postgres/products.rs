//! Database operations for products and their images.
//!
//! A product and its image set are always written in one transaction. Reads
//! resolve the referenced category, size, color and team with one batched
//! query per table rather than a join per product.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use courtside_core::{CategoryId, ColorId, ImageId, Price, ProductId, SizeId, StoreId, TeamId};

use super::categories::{CATEGORY_COLUMNS, CategoryRow};
use super::colors::{COLOR_COLUMNS, ColorRow};
use super::map_delete_error;
use super::sizes::{SIZE_COLUMNS, SizeRow};
use super::teams::{TEAM_COLUMNS, TeamRow};
use crate::db::{RepositoryError, new_image_ids};
use crate::models::{Image, Product, ProductDetail, ProductFilter, ProductInput};

/// Internal row type for product queries (images are loaded separately).
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    store_id: StoreId,
    category_id: CategoryId,
    color_id: ColorId,
    size_id: SizeId,
    team_id: TeamId,
    name: String,
    price: Price,
    description: String,
    is_featured: bool,
    is_archived: bool,
    is_retro: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self, images: Vec<Image>) -> Product {
        Product {
            id: self.id,
            store_id: self.store_id,
            category_id: self.category_id,
            color_id: self.color_id,
            size_id: self.size_id,
            team_id: self.team_id,
            name: self.name,
            price: self.price,
            description: self.description,
            is_featured: self.is_featured,
            is_archived: self.is_archived,
            is_retro: self.is_retro,
            images,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: ImageId,
    product_id: ProductId,
    url: String,
    created_at: DateTime<Utc>,
}

impl From<ImageRow> for Image {
    fn from(row: ImageRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            url: row.url,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, store_id, category_id, color_id, size_id, team_id, \
     name, price, description, is_featured, is_archived, is_retro, created_at, updated_at";

const IMAGE_COLUMNS: &str = "id, product_id, url, created_at";

/// Shared predicate for listing and counting; binds `$1..$7`.
const FILTER_PREDICATE: &str = r"
    store_id = $1
    AND is_archived = FALSE
    AND ($2::uuid IS NULL OR category_id = $2)
    AND ($3::uuid IS NULL OR color_id = $3)
    AND ($4::uuid IS NULL OR size_id = $4)
    AND ($5::uuid IS NULL OR team_id = $5)
    AND ($6::boolean IS NULL OR is_featured = $6)
    AND ($7::boolean IS NULL OR is_retro = $7)
";

fn bind_filter<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    store: StoreId,
    filter: &ProductFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(store)
        .bind(filter.category_id)
        .bind(filter.color_id)
        .bind(filter.size_id)
        .bind(filter.team_id)
        .bind(filter.is_featured)
        .bind(filter.is_retro)
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// List non-archived products matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a referenced row is missing.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product \
             WHERE {FILTER_PREDICATE} ORDER BY created_at DESC"
        );
        let rows = bind_filter(sqlx::query_as::<_, ProductRow>(&sql), store, filter)
            .fetch_all(self.pool)
            .await?;

        self.hydrate(rows).await
    }

    /// Count non-archived products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<i64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM catalog.product WHERE {FILTER_PREDICATE}");
        let (count,) = bind_filter(sqlx::query_as::<_, (i64,)>(&sql), store, filter)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Get a product with images and resolved references.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a referenced row is missing.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row]).await?.into_iter().next())
    }

    /// List the images currently attached to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn images(&self, product: ProductId) -> Result<Vec<Image>, RepositoryError> {
        let rows = sqlx::query_as::<_, ImageRow>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM catalog.image \
             WHERE product_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(product)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Number of order lines that reference this product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_line_count(&self, id: ProductId) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM catalog.order_item WHERE product_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Number of products that reference the given column value.
    ///
    /// `column` must be one of the product's reference columns.
    pub(super) async fn reference_count(
        &self,
        column: &'static str,
        id: Uuid,
    ) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM catalog.product WHERE {column} = $1"
        ))
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert a product and its images in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// written in that case.
    pub async fn create(
        &self,
        store: StoreId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO catalog.product (
                id, store_id, category_id, color_id, size_id, team_id,
                name, price, description, is_featured, is_archived, is_retro
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(ProductId::generate())
        .bind(store)
        .bind(input.category_id)
        .bind(input.color_id)
        .bind(input.size_id)
        .bind(input.team_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(input.is_featured)
        .bind(input.is_archived)
        .bind(input.is_retro)
        .fetch_one(&mut *tx)
        .await?;

        let images = insert_images(&mut tx, row.id, &input.images).await?;
        tx.commit().await?;

        Ok(row.into_product(images))
    }

    /// Replace a product's fields and its whole image set in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// previous product and images are kept in that case.
    pub async fn update(
        &self,
        store: StoreId,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE catalog.product
            SET category_id = $3, color_id = $4, size_id = $5, team_id = $6,
                name = $7, price = $8, description = $9,
                is_featured = $10, is_archived = $11, is_retro = $12,
                updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store)
        .bind(input.category_id)
        .bind(input.color_id)
        .bind(input.size_id)
        .bind(input.team_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(input.is_featured)
        .bind(input.is_archived)
        .bind(input.is_retro)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM catalog.image WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let images = insert_images(&mut tx, id, &input.images).await?;
        tx.commit().await?;

        Ok(Some(row.into_product(images)))
    }

    /// Delete a product; its images are removed by the cascading foreign key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if order lines still reference it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let images: Vec<Image> = sqlx::query_as::<_, ImageRow>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM catalog.image WHERE product_id = $1"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM catalog.product WHERE id = $1 AND store_id = $2 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_delete_error(e, "Product"))?;

        tx.commit().await?;

        Ok(row.map(|row| row.into_product(images)))
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    async fn hydrate(&self, rows: Vec<ProductRow>) -> Result<Vec<ProductDetail>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<Uuid> = rows.iter().map(|r| r.id.as_uuid()).collect();
        let category_ids: Vec<Uuid> = rows.iter().map(|r| r.category_id.as_uuid()).collect();
        let size_ids: Vec<Uuid> = rows.iter().map(|r| r.size_id.as_uuid()).collect();
        let color_ids: Vec<Uuid> = rows.iter().map(|r| r.color_id.as_uuid()).collect();
        let team_ids: Vec<Uuid> = rows.iter().map(|r| r.team_id.as_uuid()).collect();

        let mut images: HashMap<ProductId, Vec<Image>> = HashMap::new();
        let image_rows = sqlx::query_as::<_, ImageRow>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM catalog.image \
             WHERE product_id = ANY($1) ORDER BY created_at ASC, id ASC"
        ))
        .bind(&product_ids)
        .fetch_all(self.pool)
        .await?;
        for row in image_rows {
            images.entry(row.product_id).or_default().push(row.into());
        }

        let categories = fetch_by_ids::<CategoryRow, _, _>(
            self.pool,
            "catalog.category",
            CATEGORY_COLUMNS,
            &category_ids,
            |c: &crate::models::Category| c.id,
        )
        .await?;
        let sizes = fetch_by_ids::<SizeRow, _, _>(
            self.pool,
            "catalog.size",
            SIZE_COLUMNS,
            &size_ids,
            |s: &crate::models::Size| s.id,
        )
        .await?;
        let colors = fetch_by_ids::<ColorRow, _, _>(
            self.pool,
            "catalog.color",
            COLOR_COLUMNS,
            &color_ids,
            |c: &crate::models::Color| c.id,
        )
        .await?;
        let teams = fetch_by_ids::<TeamRow, _, _>(
            self.pool,
            "catalog.team",
            TEAM_COLUMNS,
            &team_ids,
            |t: &crate::models::Team| t.id,
        )
        .await?;

        rows.into_iter()
            .map(|row| {
                let missing = |what: &str| {
                    RepositoryError::DataCorruption(format!(
                        "product {} references missing {what}",
                        row.id
                    ))
                };
                let category = categories
                    .get(&row.category_id)
                    .cloned()
                    .ok_or_else(|| missing("category"))?;
                let size = sizes.get(&row.size_id).cloned().ok_or_else(|| missing("size"))?;
                let color = colors
                    .get(&row.color_id)
                    .cloned()
                    .ok_or_else(|| missing("color"))?;
                let team = teams.get(&row.team_id).cloned().ok_or_else(|| missing("team"))?;
                let product_images = images.remove(&row.id).unwrap_or_default();

                Ok(ProductDetail {
                    product: row.into_product(product_images),
                    category,
                    size,
                    color,
                    team,
                })
            })
            .collect()
    }
}

/// Insert one image row per URL and return the created images.
async fn insert_images(
    tx: &mut Transaction<'_, Postgres>,
    product: ProductId,
    urls: &[String],
) -> Result<Vec<Image>, RepositoryError> {
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = new_image_ids(urls.len())
        .iter()
        .map(ImageId::as_uuid)
        .collect();

    let rows = sqlx::query_as::<_, ImageRow>(&format!(
        r"
        INSERT INTO catalog.image (id, product_id, url)
        SELECT t.id, $1, t.url FROM UNNEST($2::uuid[], $3::text[]) AS t(id, url)
        RETURNING {IMAGE_COLUMNS}
        "
    ))
    .bind(product)
    .bind(&ids)
    .bind(urls)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load rows of `table` whose id is in `ids`, keyed by `key`.
async fn fetch_by_ids<R, T, K>(
    pool: &PgPool,
    table: &'static str,
    columns: &'static str,
    ids: &[Uuid],
    key: impl Fn(&T) -> K,
) -> Result<HashMap<K, T>, RepositoryError>
where
    R: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    T: From<R>,
    K: Eq + Hash,
{
    let rows = sqlx::query_as::<_, R>(&format!(
        "SELECT {columns} FROM {table} WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(T::from)
        .map(|item| (key(&item), item))
        .collect())
}
