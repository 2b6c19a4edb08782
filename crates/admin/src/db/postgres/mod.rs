//! `PostgreSQL` implementation of the [`Catalog`] gateway.
//!
//! Every entity has its own repository type borrowing the pool; [`PgCatalog`]
//! owns the pool and delegates.

mod billboards;
mod categories;
mod colors;
mod orders;
mod products;
mod sizes;
mod stores;
mod teams;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::{
    BillboardId, CategoryId, ColorId, ProductId, SizeId, StoreId, TeamId, UserId,
};

pub use billboards::BillboardRepository;
pub use categories::CategoryRepository;
pub use colors::ColorRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use sizes::SizeRepository;
pub use stores::StoreRepository;
pub use teams::TeamRepository;

use super::{Catalog, EntityRef, PaidOrderTotal, RepositoryError};
use crate::models::{
    Billboard, BillboardInput, Category, CategoryInput, CategoryWithBillboard, Color, ColorInput,
    Image, NewOrder, Order, Product, ProductDetail, ProductFilter, ProductInput, Size, SizeInput,
    Store, Team, TeamInput,
};

/// `PostgreSQL` foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a delete failure caused by a RESTRICT foreign key to `InUse`.
fn map_delete_error(e: sqlx::Error, entity: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    {
        return RepositoryError::InUse(format!("{entity} is still referenced"));
    }
    RepositoryError::Database(e)
}

/// Catalog gateway backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn exists_in_store(
        &self,
        table: &'static str,
        id: Uuid,
        store: StoreId,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1 AND store_id = $2)"
        ))
        .bind(id)
        .bind(store)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // Stores

    async fn create_store(&self, owner: &UserId, name: &str) -> Result<Store, RepositoryError> {
        StoreRepository::new(&self.pool).create(owner, name).await
    }

    async fn get_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).get(id).await
    }

    async fn list_stores(&self, owner: &UserId) -> Result<Vec<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).list_for_owner(owner).await
    }

    async fn rename_store(
        &self,
        id: StoreId,
        name: &str,
    ) -> Result<Option<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).rename(id, name).await
    }

    async fn delete_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).delete(id).await
    }

    // Billboards

    async fn list_billboards(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        BillboardRepository::new(&self.pool).list(store).await
    }

    async fn get_billboard(&self, id: BillboardId) -> Result<Option<Billboard>, RepositoryError> {
        BillboardRepository::new(&self.pool).get(id).await
    }

    async fn create_billboard(
        &self,
        store: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        BillboardRepository::new(&self.pool).create(store, input).await
    }

    async fn update_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, RepositoryError> {
        BillboardRepository::new(&self.pool)
            .update(store, id, input)
            .await
    }

    async fn delete_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        BillboardRepository::new(&self.pool).delete(store, id).await
    }

    // Categories

    async fn list_categories(&self, store: StoreId) -> Result<Vec<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool).list(store).await
    }

    async fn get_category(
        &self,
        id: CategoryId,
    ) -> Result<Option<CategoryWithBillboard>, RepositoryError> {
        CategoryRepository::new(&self.pool).get(id).await
    }

    async fn create_category(
        &self,
        store: StoreId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        CategoryRepository::new(&self.pool).create(store, input).await
    }

    async fn update_category(
        &self,
        store: StoreId,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool)
            .update(store, id, input)
            .await
    }

    async fn delete_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool).delete(store, id).await
    }

    // Sizes

    async fn list_sizes(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError> {
        SizeRepository::new(&self.pool).list(store).await
    }

    async fn get_size(&self, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        SizeRepository::new(&self.pool).get(id).await
    }

    async fn create_size(
        &self,
        store: StoreId,
        input: &SizeInput,
    ) -> Result<Size, RepositoryError> {
        SizeRepository::new(&self.pool).create(store, input).await
    }

    async fn update_size(
        &self,
        store: StoreId,
        id: SizeId,
        input: &SizeInput,
    ) -> Result<Option<Size>, RepositoryError> {
        SizeRepository::new(&self.pool).update(store, id, input).await
    }

    async fn delete_size(
        &self,
        store: StoreId,
        id: SizeId,
    ) -> Result<Option<Size>, RepositoryError> {
        SizeRepository::new(&self.pool).delete(store, id).await
    }

    // Colors

    async fn list_colors(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError> {
        ColorRepository::new(&self.pool).list(store).await
    }

    async fn get_color(&self, id: ColorId) -> Result<Option<Color>, RepositoryError> {
        ColorRepository::new(&self.pool).get(id).await
    }

    async fn create_color(
        &self,
        store: StoreId,
        input: &ColorInput,
    ) -> Result<Color, RepositoryError> {
        ColorRepository::new(&self.pool).create(store, input).await
    }

    async fn update_color(
        &self,
        store: StoreId,
        id: ColorId,
        input: &ColorInput,
    ) -> Result<Option<Color>, RepositoryError> {
        ColorRepository::new(&self.pool).update(store, id, input).await
    }

    async fn delete_color(
        &self,
        store: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError> {
        ColorRepository::new(&self.pool).delete(store, id).await
    }

    // Teams

    async fn list_teams(&self, store: StoreId) -> Result<Vec<Team>, RepositoryError> {
        TeamRepository::new(&self.pool).list(store).await
    }

    async fn get_team(&self, id: TeamId) -> Result<Option<Team>, RepositoryError> {
        TeamRepository::new(&self.pool).get(id).await
    }

    async fn create_team(
        &self,
        store: StoreId,
        input: &TeamInput,
    ) -> Result<Team, RepositoryError> {
        TeamRepository::new(&self.pool).create(store, input).await
    }

    async fn update_team(
        &self,
        store: StoreId,
        id: TeamId,
        input: &TeamInput,
    ) -> Result<Option<Team>, RepositoryError> {
        TeamRepository::new(&self.pool).update(store, id, input).await
    }

    async fn delete_team(
        &self,
        store: StoreId,
        id: TeamId,
    ) -> Result<Option<Team>, RepositoryError> {
        TeamRepository::new(&self.pool).delete(store, id).await
    }

    // Products

    async fn list_products(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        ProductRepository::new(&self.pool).list(store, filter).await
    }

    async fn count_products(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<i64, RepositoryError> {
        ProductRepository::new(&self.pool).count(store, filter).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        ProductRepository::new(&self.pool).get(id).await
    }

    async fn create_product(
        &self,
        store: StoreId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool).create(store, input).await
    }

    async fn update_product(
        &self,
        store: StoreId,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool)
            .update(store, id, input)
            .await
    }

    async fn delete_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_images(&self, product: ProductId) -> Result<Vec<Image>, RepositoryError> {
        ProductRepository::new(&self.pool).images(product).await
    }

    // References

    async fn reference_in_store(
        &self,
        store: StoreId,
        entity: EntityRef,
    ) -> Result<bool, RepositoryError> {
        match entity {
            EntityRef::Store(id) => Ok(id == store && self.get_store(id).await?.is_some()),
            EntityRef::Billboard(id) => {
                self.exists_in_store("catalog.billboard", id.as_uuid(), store)
                    .await
            }
            EntityRef::Category(id) => {
                self.exists_in_store("catalog.category", id.as_uuid(), store)
                    .await
            }
            EntityRef::Size(id) => {
                self.exists_in_store("catalog.size", id.as_uuid(), store)
                    .await
            }
            EntityRef::Color(id) => {
                self.exists_in_store("catalog.color", id.as_uuid(), store)
                    .await
            }
            EntityRef::Team(id) => {
                self.exists_in_store("catalog.team", id.as_uuid(), store)
                    .await
            }
            EntityRef::Product(id) => {
                self.exists_in_store("catalog.product", id.as_uuid(), store)
                    .await
            }
        }
    }

    async fn usage_count(&self, entity: EntityRef) -> Result<i64, RepositoryError> {
        let products = ProductRepository::new(&self.pool);
        match entity {
            EntityRef::Store(id) => StoreRepository::new(&self.pool).child_count(id).await,
            EntityRef::Billboard(id) => BillboardRepository::new(&self.pool).usage_count(id).await,
            EntityRef::Category(id) => products.reference_count("category_id", id.as_uuid()).await,
            EntityRef::Size(id) => products.reference_count("size_id", id.as_uuid()).await,
            EntityRef::Color(id) => ColorRepository::new(&self.pool).usage_count(id).await,
            EntityRef::Team(id) => products.reference_count("team_id", id.as_uuid()).await,
            EntityRef::Product(id) => products.order_line_count(id).await,
        }
    }

    // Orders

    async fn create_order(
        &self,
        store: StoreId,
        order: &NewOrder,
    ) -> Result<Order, RepositoryError> {
        OrderRepository::new(&self.pool).create(store, order).await
    }

    async fn list_orders(&self, store: StoreId) -> Result<Vec<Order>, RepositoryError> {
        OrderRepository::new(&self.pool).list(store).await
    }

    async fn count_paid_orders(&self, store: StoreId) -> Result<i64, RepositoryError> {
        OrderRepository::new(&self.pool).count_paid(store).await
    }

    async fn paid_order_totals(
        &self,
        store: StoreId,
    ) -> Result<Vec<PaidOrderTotal>, RepositoryError> {
        OrderRepository::new(&self.pool).paid_totals(store).await
    }
}
