//! Persistence gateway for the dashboard.
//!
//! # Schema: `catalog`
//!
//! ## Tables
//!
//! - `store` - Tenants, owned by an identity-provider user
//! - `billboard`, `category`, `size`, `color`, `team` - Store-scoped catalog
//! - `product` - Store-scoped products
//! - `image` - Product images (cascade with their product)
//! - `customer_order`, `order_item` - Orders written by the storefront checkout
//!
//! # Implementations
//!
//! - [`PgCatalog`] - `PostgreSQL` via sqlx, the production gateway
//! - [`MemoryCatalog`] - in-process tables with the same observable
//!   behaviour, used by tests and local demos
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p courtside-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use courtside_core::{
    BillboardId, CategoryId, ColorId, ImageId, ProductId, SizeId, StoreId, TeamId, UserId,
};

use crate::models::{
    Billboard, BillboardInput, Category, CategoryInput, CategoryWithBillboard, Color, ColorInput,
    Image, NewOrder, Order, Product, ProductDetail, ProductFilter, ProductInput, Size, SizeInput,
    Store, Team, TeamInput,
};

pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The row is still referenced by other rows.
    #[error("still referenced: {0}")]
    InUse(String),
}

/// A reference to a store-scoped entity, used for ownership and usage checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// A store (the tenant itself).
    Store(StoreId),
    /// A billboard.
    Billboard(BillboardId),
    /// A category.
    Category(CategoryId),
    /// A size.
    Size(SizeId),
    /// A color.
    Color(ColorId),
    /// A team.
    Team(TeamId),
    /// A product.
    Product(ProductId),
}

impl EntityRef {
    /// Human-readable entity name, used in error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Store(_) => "Store",
            Self::Billboard(_) => "Billboard",
            Self::Category(_) => "Category",
            Self::Size(_) => "Size",
            Self::Color(_) => "Color",
            Self::Team(_) => "Team",
            Self::Product(_) => "Product",
        }
    }
}

/// A paid order reduced to what the revenue aggregates need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaidOrderTotal {
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Sum of the order's line item prices.
    pub total: Decimal,
}

/// Typed data access over every dashboard entity.
///
/// Update and delete operations are scoped to `store`: an id that exists in
/// another store behaves exactly like an id that does not exist (`None`).
/// Single-entity `get_*` lookups are deliberately unscoped.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    // Stores

    /// Create a store owned by `owner`.
    async fn create_store(&self, owner: &UserId, name: &str) -> Result<Store, RepositoryError>;
    /// Look up a store by id.
    async fn get_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError>;
    /// Stores owned by `owner`, oldest first.
    async fn list_stores(&self, owner: &UserId) -> Result<Vec<Store>, RepositoryError>;
    /// Rename a store.
    async fn rename_store(&self, id: StoreId, name: &str)
    -> Result<Option<Store>, RepositoryError>;
    /// Delete a store. Fails with [`RepositoryError::InUse`] while it has children.
    async fn delete_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError>;

    // Billboards

    /// Billboards of a store, newest first.
    async fn list_billboards(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError>;
    /// Look up a billboard by id.
    async fn get_billboard(&self, id: BillboardId) -> Result<Option<Billboard>, RepositoryError>;
    /// Insert a billboard.
    async fn create_billboard(
        &self,
        store: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError>;
    /// Replace every mutable field of a billboard.
    async fn update_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, RepositoryError>;
    /// Delete a billboard.
    async fn delete_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError>;

    // Categories

    /// Categories of a store, alphabetical.
    async fn list_categories(&self, store: StoreId) -> Result<Vec<Category>, RepositoryError>;
    /// Look up a category (with its billboard) by id.
    async fn get_category(
        &self,
        id: CategoryId,
    ) -> Result<Option<CategoryWithBillboard>, RepositoryError>;
    /// Insert a category.
    async fn create_category(
        &self,
        store: StoreId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError>;
    /// Replace every mutable field of a category.
    async fn update_category(
        &self,
        store: StoreId,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, RepositoryError>;
    /// Delete a category.
    async fn delete_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<Category>, RepositoryError>;

    // Sizes

    /// Sizes of a store, alphabetical.
    async fn list_sizes(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError>;
    /// Look up a size by id.
    async fn get_size(&self, id: SizeId) -> Result<Option<Size>, RepositoryError>;
    /// Insert a size.
    async fn create_size(&self, store: StoreId, input: &SizeInput)
    -> Result<Size, RepositoryError>;
    /// Replace every mutable field of a size.
    async fn update_size(
        &self,
        store: StoreId,
        id: SizeId,
        input: &SizeInput,
    ) -> Result<Option<Size>, RepositoryError>;
    /// Delete a size.
    async fn delete_size(&self, store: StoreId, id: SizeId)
    -> Result<Option<Size>, RepositoryError>;

    // Colors

    /// Colors of a store, alphabetical.
    async fn list_colors(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError>;
    /// Look up a color by id.
    async fn get_color(&self, id: ColorId) -> Result<Option<Color>, RepositoryError>;
    /// Insert a color.
    async fn create_color(
        &self,
        store: StoreId,
        input: &ColorInput,
    ) -> Result<Color, RepositoryError>;
    /// Replace every mutable field of a color.
    async fn update_color(
        &self,
        store: StoreId,
        id: ColorId,
        input: &ColorInput,
    ) -> Result<Option<Color>, RepositoryError>;
    /// Delete a color.
    async fn delete_color(
        &self,
        store: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError>;

    // Teams

    /// Teams of a store, newest first.
    async fn list_teams(&self, store: StoreId) -> Result<Vec<Team>, RepositoryError>;
    /// Look up a team by id.
    async fn get_team(&self, id: TeamId) -> Result<Option<Team>, RepositoryError>;
    /// Insert a team.
    async fn create_team(&self, store: StoreId, input: &TeamInput)
    -> Result<Team, RepositoryError>;
    /// Replace every mutable field of a team.
    async fn update_team(
        &self,
        store: StoreId,
        id: TeamId,
        input: &TeamInput,
    ) -> Result<Option<Team>, RepositoryError>;
    /// Delete a team.
    async fn delete_team(&self, store: StoreId, id: TeamId)
    -> Result<Option<Team>, RepositoryError>;

    // Products

    /// Non-archived products matching `filter`, newest first.
    async fn list_products(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError>;
    /// Number of non-archived products matching `filter`.
    async fn count_products(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<i64, RepositoryError>;
    /// Look up a product (with images and references) by id.
    async fn get_product(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError>;
    /// Insert a product and its images atomically.
    async fn create_product(
        &self,
        store: StoreId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError>;
    /// Replace every mutable field of a product and swap its whole image
    /// set, atomically.
    async fn update_product(
        &self,
        store: StoreId,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError>;
    /// Delete a product; its images go with it.
    async fn delete_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError>;
    /// Images currently attached to a product.
    async fn list_images(&self, product: ProductId) -> Result<Vec<Image>, RepositoryError>;

    // References

    /// Whether `entity` exists and belongs to `store`.
    async fn reference_in_store(
        &self,
        store: StoreId,
        entity: EntityRef,
    ) -> Result<bool, RepositoryError>;
    /// Number of rows that reference `entity` and would block its deletion.
    async fn usage_count(&self, entity: EntityRef) -> Result<i64, RepositoryError>;

    // Orders

    /// Record an order. Unknown product ids fail with [`RepositoryError::NotFound`].
    async fn create_order(&self, store: StoreId, order: &NewOrder)
    -> Result<Order, RepositoryError>;
    /// Orders of a store with their items, newest first.
    async fn list_orders(&self, store: StoreId) -> Result<Vec<Order>, RepositoryError>;
    /// Number of paid orders.
    async fn count_paid_orders(&self, store: StoreId) -> Result<i64, RepositoryError>;
    /// Per-order totals of every paid order.
    async fn paid_order_totals(
        &self,
        store: StoreId,
    ) -> Result<Vec<PaidOrderTotal>, RepositoryError>;
}

/// Generate ids for a batch of new image rows.
pub(crate) fn new_image_ids(count: usize) -> Vec<ImageId> {
    (0..count).map(|_| ImageId::generate()).collect()
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
