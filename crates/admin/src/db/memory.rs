//! In-process implementation of the [`Catalog`] gateway.
//!
//! Mirrors the relational schema closely enough that services behave the same
//! against either gateway: RESTRICT references fail deletes with
//! [`RepositoryError::InUse`], images cascade with their product, and list
//! ordering matches the SQL `ORDER BY` clauses.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use courtside_core::{
    BillboardId, CategoryId, ColorId, ImageId, OrderId, OrderItemId, ProductId, SizeId, StoreId,
    TeamId, UserId,
};

use super::{Catalog, EntityRef, PaidOrderTotal, RepositoryError};
use crate::models::{
    Billboard, BillboardInput, Category, CategoryInput, CategoryWithBillboard, Color, ColorInput,
    Image, NewOrder, Order, OrderItem, Product, ProductDetail, ProductFilter, ProductInput, Size,
    SizeInput, Store, Team, TeamInput,
};

/// An order as stored: lines hold product ids, names and prices are joined on read.
#[derive(Debug, Clone)]
struct OrderRecord {
    id: OrderId,
    store_id: StoreId,
    is_paid: bool,
    phone: String,
    address: String,
    lines: Vec<(OrderItemId, ProductId)>,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    stores: Vec<Store>,
    billboards: Vec<Billboard>,
    categories: Vec<Category>,
    sizes: Vec<Size>,
    colors: Vec<Color>,
    teams: Vec<Team>,
    /// Products without images; see `images`.
    products: Vec<Product>,
    images: Vec<Image>,
    orders: Vec<OrderRecord>,
}

impl Tables {
    fn images_of(&self, product: ProductId) -> Vec<Image> {
        self.images
            .iter()
            .filter(|image| image.product_id == product)
            .cloned()
            .collect()
    }

    fn with_images(&self, product: &Product) -> Product {
        Product {
            images: self.images_of(product.id),
            ..product.clone()
        }
    }

    fn detail(&self, product: &Product) -> Result<ProductDetail, RepositoryError> {
        let missing = |what: &str| {
            RepositoryError::DataCorruption(format!(
                "product {} references missing {what}",
                product.id
            ))
        };
        let category = self
            .categories
            .iter()
            .find(|c| c.id == product.category_id)
            .cloned()
            .ok_or_else(|| missing("category"))?;
        let size = self
            .sizes
            .iter()
            .find(|s| s.id == product.size_id)
            .cloned()
            .ok_or_else(|| missing("size"))?;
        let color = self
            .colors
            .iter()
            .find(|c| c.id == product.color_id)
            .cloned()
            .ok_or_else(|| missing("color"))?;
        let team = self
            .teams
            .iter()
            .find(|t| t.id == product.team_id)
            .cloned()
            .ok_or_else(|| missing("team"))?;

        Ok(ProductDetail {
            product: self.with_images(product),
            category,
            size,
            color,
            team,
        })
    }

    fn order(&self, record: &OrderRecord) -> Order {
        let items = record
            .lines
            .iter()
            .filter_map(|(line_id, product_id)| {
                self.products
                    .iter()
                    .find(|p| p.id == *product_id)
                    .map(|p| OrderItem {
                        id: *line_id,
                        order_id: record.id,
                        product_id: p.id,
                        product_name: p.name.clone(),
                        price: p.price,
                    })
            })
            .collect();

        Order {
            id: record.id,
            store_id: record.store_id,
            is_paid: record.is_paid,
            phone: record.phone.clone(),
            address: record.address.clone(),
            items,
            created_at: record.created_at,
            updated_at: record.created_at,
        }
    }

    fn usage(&self, entity: EntityRef) -> usize {
        match entity {
            EntityRef::Store(id) => {
                self.billboards.iter().filter(|r| r.store_id == id).count()
                    + self.categories.iter().filter(|r| r.store_id == id).count()
                    + self.sizes.iter().filter(|r| r.store_id == id).count()
                    + self.colors.iter().filter(|r| r.store_id == id).count()
                    + self.teams.iter().filter(|r| r.store_id == id).count()
                    + self.products.iter().filter(|r| r.store_id == id).count()
                    + self.orders.iter().filter(|r| r.store_id == id).count()
            }
            EntityRef::Billboard(id) => {
                self.categories.iter().filter(|c| c.billboard_id == id).count()
                    + self.teams.iter().filter(|t| t.billboard_id == id).count()
            }
            EntityRef::Category(id) => self
                .products
                .iter()
                .filter(|p| p.category_id == id)
                .count(),
            EntityRef::Size(id) => self.products.iter().filter(|p| p.size_id == id).count(),
            EntityRef::Color(id) => {
                self.products.iter().filter(|p| p.color_id == id).count()
                    + self
                        .teams
                        .iter()
                        .filter(|t| t.primary_color_id == id || t.secondary_color_id == id)
                        .count()
            }
            EntityRef::Team(id) => self.products.iter().filter(|p| p.team_id == id).count(),
            EntityRef::Product(id) => self
                .orders
                .iter()
                .flat_map(|o| o.lines.iter())
                .filter(|(_, product_id)| *product_id == id)
                .count(),
        }
    }

    fn guard_unused(&self, entity: EntityRef) -> Result<(), RepositoryError> {
        if self.usage(entity) > 0 {
            return Err(RepositoryError::InUse(format!(
                "{} is still referenced",
                entity.label()
            )));
        }
        Ok(())
    }

    fn new_images(product: ProductId, urls: &[String]) -> Vec<Image> {
        let now = Utc::now();
        urls.iter()
            .map(|url| Image {
                id: ImageId::generate(),
                product_id: product,
                url: url.clone(),
                created_at: now,
            })
            .collect()
    }
}

/// Newest first; rows created in the same instant keep reverse insertion order.
fn newest_first<T>(
    rows: impl DoubleEndedIterator<Item = T>,
    created_at: impl Fn(&T) -> chrono::DateTime<Utc>,
) -> Vec<T> {
    let mut out: Vec<T> = rows.rev().collect();
    out.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    out
}

/// Alphabetical, case-insensitive, with byte order breaking ties. Mirrors
/// `ORDER BY lower(name), name COLLATE "C"` on the Postgres side. The sort
/// is stable, so equal names keep their newest-first order.
fn sort_by_name<T>(rows: &mut [T], name: impl Fn(&T) -> &str) {
    rows.sort_by(|a, b| {
        let (a, b) = (name(a), name(b));
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}

/// Remove the first row matching `pred` and return it.
fn take_where<T>(rows: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> Option<T> {
    rows.iter().position(pred).map(|index| rows.remove(index))
}

/// Catalog gateway over in-process tables.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    // Stores

    async fn create_store(&self, owner: &UserId, name: &str) -> Result<Store, RepositoryError> {
        let now = Utc::now();
        let store = Store {
            id: StoreId::generate(),
            name: name.to_string(),
            user_id: owner.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.stores.push(store.clone());
        Ok(store)
    }

    async fn get_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.stores.iter().find(|s| s.id == id).cloned())
    }

    async fn list_stores(&self, owner: &UserId) -> Result<Vec<Store>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .iter()
            .filter(|s| &s.user_id == owner)
            .cloned()
            .collect())
    }

    async fn rename_store(
        &self,
        id: StoreId,
        name: &str,
    ) -> Result<Option<Store>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.stores.iter_mut().find(|s| s.id == id).map(|store| {
            name.clone_into(&mut store.name);
            store.updated_at = Utc::now();
            store.clone()
        }))
    }

    async fn delete_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.stores.iter().any(|s| s.id == id) {
            return Ok(None);
        }
        tables.guard_unused(EntityRef::Store(id))?;
        Ok(take_where(&mut tables.stores, |s| s.id == id))
    }

    // Billboards

    async fn list_billboards(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .billboards
                .iter()
                .filter(|b| b.store_id == store)
                .cloned(),
            |b| b.created_at,
        ))
    }

    async fn get_billboard(&self, id: BillboardId) -> Result<Option<Billboard>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.billboards.iter().find(|b| b.id == id).cloned())
    }

    async fn create_billboard(
        &self,
        store: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        let now = Utc::now();
        let billboard = Billboard {
            id: BillboardId::generate(),
            store_id: store,
            label: input.label.clone(),
            image_url: input.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.billboards.push(billboard.clone());
        Ok(billboard)
    }

    async fn update_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .billboards
            .iter_mut()
            .find(|b| b.id == id && b.store_id == store)
            .map(|b| {
                b.label.clone_from(&input.label);
                b.image_url.clone_from(&input.image_url);
                b.updated_at = Utc::now();
                b.clone()
            }))
    }

    async fn delete_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables
            .billboards
            .iter()
            .any(|b| b.id == id && b.store_id == store)
        {
            return Ok(None);
        }
        tables.guard_unused(EntityRef::Billboard(id))?;
        Ok(take_where(&mut tables.billboards, |b| b.id == id))
    }

    // Categories

    async fn list_categories(&self, store: StoreId) -> Result<Vec<Category>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows = newest_first(
            tables
                .categories
                .iter()
                .filter(|c| c.store_id == store)
                .cloned(),
            |c| c.created_at,
        );
        sort_by_name(&mut rows, |row| &row.name);
        Ok(rows)
    }

    async fn get_category(
        &self,
        id: CategoryId,
    ) -> Result<Option<CategoryWithBillboard>, RepositoryError> {
        let tables = self.tables.read().await;
        let Some(category) = tables.categories.iter().find(|c| c.id == id).cloned() else {
            return Ok(None);
        };
        let billboard = tables
            .billboards
            .iter()
            .find(|b| b.id == category.billboard_id)
            .cloned()
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

    async fn create_category(
        &self,
        store: StoreId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let now = Utc::now();
        let category = Category {
            id: CategoryId::generate(),
            store_id: store,
            billboard_id: input.billboard_id,
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        store: StoreId,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.store_id == store)
            .map(|c| {
                c.name.clone_from(&input.name);
                c.billboard_id = input.billboard_id;
                c.updated_at = Utc::now();
                c.clone()
            }))
    }

    async fn delete_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<Category>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables
            .categories
            .iter()
            .any(|c| c.id == id && c.store_id == store)
        {
            return Ok(None);
        }
        tables.guard_unused(EntityRef::Category(id))?;
        Ok(take_where(&mut tables.categories, |c| c.id == id))
    }

    // Sizes

    async fn list_sizes(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows = newest_first(
            tables.sizes.iter().filter(|s| s.store_id == store).cloned(),
            |s| s.created_at,
        );
        sort_by_name(&mut rows, |row| &row.name);
        Ok(rows)
    }

    async fn get_size(&self, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.sizes.iter().find(|s| s.id == id).cloned())
    }

    async fn create_size(
        &self,
        store: StoreId,
        input: &SizeInput,
    ) -> Result<Size, RepositoryError> {
        let now = Utc::now();
        let size = Size {
            id: SizeId::generate(),
            store_id: store,
            name: input.name.clone(),
            value: input.value.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.sizes.push(size.clone());
        Ok(size)
    }

    async fn update_size(
        &self,
        store: StoreId,
        id: SizeId,
        input: &SizeInput,
    ) -> Result<Option<Size>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .sizes
            .iter_mut()
            .find(|s| s.id == id && s.store_id == store)
            .map(|s| {
                s.name.clone_from(&input.name);
                s.value.clone_from(&input.value);
                s.updated_at = Utc::now();
                s.clone()
            }))
    }

    async fn delete_size(
        &self,
        store: StoreId,
        id: SizeId,
    ) -> Result<Option<Size>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables
            .sizes
            .iter()
            .any(|s| s.id == id && s.store_id == store)
        {
            return Ok(None);
        }
        tables.guard_unused(EntityRef::Size(id))?;
        Ok(take_where(&mut tables.sizes, |s| s.id == id))
    }

    // Colors

    async fn list_colors(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows = newest_first(
            tables.colors.iter().filter(|c| c.store_id == store).cloned(),
            |c| c.created_at,
        );
        sort_by_name(&mut rows, |row| &row.name);
        Ok(rows)
    }

    async fn get_color(&self, id: ColorId) -> Result<Option<Color>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.colors.iter().find(|c| c.id == id).cloned())
    }

    async fn create_color(
        &self,
        store: StoreId,
        input: &ColorInput,
    ) -> Result<Color, RepositoryError> {
        let now = Utc::now();
        let color = Color {
            id: ColorId::generate(),
            store_id: store,
            name: input.name.clone(),
            value: input.value.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.colors.push(color.clone());
        Ok(color)
    }

    async fn update_color(
        &self,
        store: StoreId,
        id: ColorId,
        input: &ColorInput,
    ) -> Result<Option<Color>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .colors
            .iter_mut()
            .find(|c| c.id == id && c.store_id == store)
            .map(|c| {
                c.name.clone_from(&input.name);
                c.value.clone_from(&input.value);
                c.updated_at = Utc::now();
                c.clone()
            }))
    }

    async fn delete_color(
        &self,
        store: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables
            .colors
            .iter()
            .any(|c| c.id == id && c.store_id == store)
        {
            return Ok(None);
        }
        tables.guard_unused(EntityRef::Color(id))?;
        Ok(take_where(&mut tables.colors, |c| c.id == id))
    }

    // Teams

    async fn list_teams(&self, store: StoreId) -> Result<Vec<Team>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.teams.iter().filter(|t| t.store_id == store).cloned(),
            |t| t.created_at,
        ))
    }

    async fn get_team(&self, id: TeamId) -> Result<Option<Team>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn create_team(
        &self,
        store: StoreId,
        input: &TeamInput,
    ) -> Result<Team, RepositoryError> {
        let now = Utc::now();
        let team = Team {
            id: TeamId::generate(),
            store_id: store,
            name: input.name.clone(),
            image_url: input.image_url.clone(),
            billboard_id: input.billboard_id,
            primary_color_id: input.primary_color_id,
            secondary_color_id: input.secondary_color_id,
            conference: input.conference.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.teams.push(team.clone());
        Ok(team)
    }

    async fn update_team(
        &self,
        store: StoreId,
        id: TeamId,
        input: &TeamInput,
    ) -> Result<Option<Team>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .teams
            .iter_mut()
            .find(|t| t.id == id && t.store_id == store)
            .map(|t| {
                t.name.clone_from(&input.name);
                t.image_url.clone_from(&input.image_url);
                t.billboard_id = input.billboard_id;
                t.primary_color_id = input.primary_color_id;
                t.secondary_color_id = input.secondary_color_id;
                t.conference = input.conference.clone();
                t.updated_at = Utc::now();
                t.clone()
            }))
    }

    async fn delete_team(
        &self,
        store: StoreId,
        id: TeamId,
    ) -> Result<Option<Team>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables
            .teams
            .iter()
            .any(|t| t.id == id && t.store_id == store)
        {
            return Ok(None);
        }
        tables.guard_unused(EntityRef::Team(id))?;
        Ok(take_where(&mut tables.teams, |t| t.id == id))
    }

    // Products

    async fn list_products(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        newest_first(
            tables
                .products
                .iter()
                .filter(|p| p.store_id == store && filter.matches(p)),
            |p| p.created_at,
        )
        .into_iter()
        .map(|p| tables.detail(p))
        .collect()
    }

    async fn count_products(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<i64, RepositoryError> {
        let tables = self.tables.read().await;
        let count = tables
            .products
            .iter()
            .filter(|p| p.store_id == store && filter.matches(p))
            .count();
        i64::try_from(count).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.detail(p))
            .transpose()
    }

    async fn create_product(
        &self,
        store: StoreId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let id = ProductId::generate();
        let images = Tables::new_images(id, &input.images);
        let product = Product {
            id,
            store_id: store,
            category_id: input.category_id,
            color_id: input.color_id,
            size_id: input.size_id,
            team_id: input.team_id,
            name: input.name.clone(),
            price: input.price,
            description: input.description.clone(),
            is_featured: input.is_featured,
            is_archived: input.is_archived,
            is_retro: input.is_retro,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut tables = self.tables.write().await;
        tables.products.push(product.clone());
        tables.images.extend(images.iter().cloned());
        Ok(Product { images, ..product })
    }

    async fn update_product(
        &self,
        store: StoreId,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables
            .products
            .iter_mut()
            .find(|p| p.id == id && p.store_id == store)
        else {
            return Ok(None);
        };

        product.category_id = input.category_id;
        product.color_id = input.color_id;
        product.size_id = input.size_id;
        product.team_id = input.team_id;
        product.name.clone_from(&input.name);
        product.price = input.price;
        product.description.clone_from(&input.description);
        product.is_featured = input.is_featured;
        product.is_archived = input.is_archived;
        product.is_retro = input.is_retro;
        product.updated_at = Utc::now();
        let updated = product.clone();

        let images = Tables::new_images(id, &input.images);
        tables.images.retain(|image| image.product_id != id);
        tables.images.extend(images.iter().cloned());

        Ok(Some(Product { images, ..updated }))
    }

    async fn delete_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables
            .products
            .iter()
            .any(|p| p.id == id && p.store_id == store)
        {
            return Ok(None);
        }
        tables.guard_unused(EntityRef::Product(id))?;

        let images = tables.images_of(id);
        tables.images.retain(|image| image.product_id != id);
        Ok(take_where(&mut tables.products, |p| p.id == id).map(|p| Product { images, ..p }))
    }

    async fn list_images(&self, product: ProductId) -> Result<Vec<Image>, RepositoryError> {
        Ok(self.tables.read().await.images_of(product))
    }

    // References

    async fn reference_in_store(
        &self,
        store: StoreId,
        entity: EntityRef,
    ) -> Result<bool, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(match entity {
            EntityRef::Store(id) => id == store && tables.stores.iter().any(|s| s.id == id),
            EntityRef::Billboard(id) => tables
                .billboards
                .iter()
                .any(|b| b.id == id && b.store_id == store),
            EntityRef::Category(id) => tables
                .categories
                .iter()
                .any(|c| c.id == id && c.store_id == store),
            EntityRef::Size(id) => tables
                .sizes
                .iter()
                .any(|s| s.id == id && s.store_id == store),
            EntityRef::Color(id) => tables
                .colors
                .iter()
                .any(|c| c.id == id && c.store_id == store),
            EntityRef::Team(id) => tables
                .teams
                .iter()
                .any(|t| t.id == id && t.store_id == store),
            EntityRef::Product(id) => tables
                .products
                .iter()
                .any(|p| p.id == id && p.store_id == store),
        })
    }

    async fn usage_count(&self, entity: EntityRef) -> Result<i64, RepositoryError> {
        let count = self.tables.read().await.usage(entity);
        i64::try_from(count).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }

    // Orders

    async fn create_order(
        &self,
        store: StoreId,
        order: &NewOrder,
    ) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        for product_id in &order.product_ids {
            if !tables
                .products
                .iter()
                .any(|p| p.id == *product_id && p.store_id == store)
            {
                return Err(RepositoryError::NotFound);
            }
        }

        let record = OrderRecord {
            id: OrderId::generate(),
            store_id: store,
            is_paid: order.is_paid,
            phone: order.phone.clone(),
            address: order.address.clone(),
            lines: order
                .product_ids
                .iter()
                .map(|product_id| (OrderItemId::generate(), *product_id))
                .collect(),
            created_at: order.created_at,
        };
        let created = tables.order(&record);
        tables.orders.push(record);
        Ok(created)
    }

    async fn list_orders(&self, store: StoreId) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.orders.iter().filter(|o| o.store_id == store),
            |o| o.created_at,
        )
        .into_iter()
        .map(|o| tables.order(o))
        .collect())
    }

    async fn count_paid_orders(&self, store: StoreId) -> Result<i64, RepositoryError> {
        let tables = self.tables.read().await;
        let count = tables
            .orders
            .iter()
            .filter(|o| o.store_id == store && o.is_paid)
            .count();
        i64::try_from(count).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }

    async fn paid_order_totals(
        &self,
        store: StoreId,
    ) -> Result<Vec<PaidOrderTotal>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.store_id == store && o.is_paid)
            .map(|o| {
                let order = tables.order(o);
                PaidOrderTotal {
                    created_at: order.created_at,
                    total: order.total_price(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courtside_core::{Conference, Price};
    use rust_decimal::Decimal;

    use super::*;

    struct Fixture {
        catalog: MemoryCatalog,
        store: StoreId,
        billboard: BillboardId,
        category: CategoryId,
        size: SizeId,
        color: ColorId,
        team: TeamId,
    }

    async fn fixture() -> Fixture {
        let catalog = MemoryCatalog::new();
        let owner = UserId::parse("user_1").unwrap();
        let store = catalog.create_store(&owner, "Courtside").await.unwrap().id;
        let billboard = catalog
            .create_billboard(
                store,
                &BillboardInput {
                    label: "Finals".to_string(),
                    image_url: "https://img.example/finals.png".to_string(),
                },
            )
            .await
            .unwrap()
            .id;
        let category = catalog
            .create_category(
                store,
                &CategoryInput {
                    name: "Jerseys".to_string(),
                    billboard_id: billboard,
                },
            )
            .await
            .unwrap()
            .id;
        let size = catalog
            .create_size(
                store,
                &SizeInput {
                    name: "Large".to_string(),
                    value: "L".to_string(),
                },
            )
            .await
            .unwrap()
            .id;
        let color = catalog
            .create_color(
                store,
                &ColorInput {
                    name: "Green".to_string(),
                    value: "#007A33".to_string(),
                },
            )
            .await
            .unwrap()
            .id;
        let team = catalog
            .create_team(
                store,
                &TeamInput {
                    name: "Boston".to_string(),
                    image_url: "https://img.example/bos.png".to_string(),
                    billboard_id: billboard,
                    primary_color_id: color,
                    secondary_color_id: color,
                    conference: Conference::parse("East").unwrap(),
                },
            )
            .await
            .unwrap()
            .id;
        Fixture {
            catalog,
            store,
            billboard,
            category,
            size,
            color,
            team,
        }
    }

    fn product_input(f: &Fixture, name: &str, images: &[&str]) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price: Price::from_cents(11_000).unwrap(),
            description: "Swingman".to_string(),
            images: images.iter().map(ToString::to_string).collect(),
            color_id: f.color,
            category_id: f.category,
            size_id: f.size,
            team_id: f.team,
            is_featured: false,
            is_archived: false,
            is_retro: false,
        }
    }

    #[tokio::test]
    async fn test_update_replaces_image_set() {
        let f = fixture().await;
        let product = f
            .catalog
            .create_product(f.store, &product_input(&f, "Home", &["a", "b"]))
            .await
            .unwrap();
        assert_eq!(product.images.len(), 2);

        let updated = f
            .catalog
            .update_product(f.store, product.id, &product_input(&f, "Home", &["c"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.images.len(), 1);

        let urls: Vec<String> = f
            .catalog
            .list_images(product.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.url)
            .collect();
        assert_eq!(urls, vec!["c".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_product_cascades_images() {
        let f = fixture().await;
        let product = f
            .catalog
            .create_product(f.store, &product_input(&f, "Home", &["a", "b"]))
            .await
            .unwrap();
        f.catalog.delete_product(f.store, product.id).await.unwrap();
        assert!(f.catalog.list_images(product.id).await.unwrap().is_empty());
        assert!(f.catalog.get_product(product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_referenced_rows_are_in_use() {
        let f = fixture().await;
        f.catalog
            .create_product(f.store, &product_input(&f, "Home", &["a"]))
            .await
            .unwrap();

        let err = f.catalog.delete_size(f.store, f.size).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InUse(_)));
        let err = f
            .catalog
            .delete_billboard(f.store, f.billboard)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InUse(_)));
        assert_eq!(
            f.catalog.usage_count(EntityRef::Color(f.color)).await.unwrap(),
            2
        );
        let err = f.catalog.delete_store(f.store).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InUse(_)));
    }

    #[tokio::test]
    async fn test_scoped_mutations_ignore_other_stores() {
        let f = fixture().await;
        let other = StoreId::generate();
        let input = SizeInput {
            name: "XL".to_string(),
            value: "XL".to_string(),
        };
        assert!(
            f.catalog
                .update_size(other, f.size, &input)
                .await
                .unwrap()
                .is_none()
        );
        assert!(f.catalog.delete_size(other, f.size).await.unwrap().is_none());
        assert!(
            !f.catalog
                .reference_in_store(other, EntityRef::Size(f.size))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_names_sort_case_insensitively() {
        let catalog = MemoryCatalog::new();
        let owner = UserId::parse("user_1").unwrap();
        let store = catalog.create_store(&owner, "Sizes").await.unwrap().id;
        for name in ["small", "Large", "medium", "Medium"] {
            let input = SizeInput {
                name: name.to_string(),
                value: name.to_string(),
            };
            catalog.create_size(store, &input).await.unwrap();
        }

        let names: Vec<String> = catalog
            .list_sizes(store)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Large", "Medium", "medium", "small"]);
    }

    #[tokio::test]
    async fn test_products_newest_first_and_archived_hidden() {
        let f = fixture().await;
        let first = f
            .catalog
            .create_product(f.store, &product_input(&f, "First", &["a"]))
            .await
            .unwrap();
        let second = f
            .catalog
            .create_product(f.store, &product_input(&f, "Second", &["b"]))
            .await
            .unwrap();
        let mut archived = product_input(&f, "Archived", &["c"]);
        archived.is_archived = true;
        f.catalog.create_product(f.store, &archived).await.unwrap();

        let listed: Vec<ProductId> = f
            .catalog
            .list_products(f.store, &ProductFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.product.id)
            .collect();
        assert_eq!(listed, vec![second.id, first.id]);
        assert_eq!(
            f.catalog
                .count_products(f.store, &ProductFilter::default())
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_order_totals_follow_product_prices() {
        let f = fixture().await;
        let product = f
            .catalog
            .create_product(f.store, &product_input(&f, "Home", &["a"]))
            .await
            .unwrap();
        let order = NewOrder {
            is_paid: true,
            phone: "555-0100".to_string(),
            address: "1 Court St".to_string(),
            product_ids: vec![product.id, product.id],
            created_at: Utc::now(),
        };
        f.catalog.create_order(f.store, &order).await.unwrap();

        let totals = f.catalog.paid_order_totals(f.store).await.unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals.first().unwrap().total, Decimal::new(22_000, 2));
        assert_eq!(f.catalog.count_paid_orders(f.store).await.unwrap(), 1);

        let err = f
            .catalog
            .delete_product(f.store, product.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InUse(_)));
    }

    #[tokio::test]
    async fn test_order_with_foreign_product_is_rejected() {
        let f = fixture().await;
        let order = NewOrder {
            is_paid: false,
            phone: String::new(),
            address: String::new(),
            product_ids: vec![ProductId::generate()],
            created_at: Utc::now(),
        };
        let err = f.catalog.create_order(f.store, &order).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
