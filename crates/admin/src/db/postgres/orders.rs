//! Database operations for orders.
//!
//! Orders are written by the storefront checkout (and the CLI seeder); the
//! dashboard reads them for the orders table and the overview aggregates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use courtside_core::{OrderId, OrderItemId, Price, ProductId, StoreId};

use crate::db::{PaidOrderTotal, RepositoryError};
use crate::models::{NewOrder, Order, OrderItem};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    store_id: StoreId,
    is_paid: bool,
    phone: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            store_id: self.store_id,
            is_paid: self.is_paid,
            phone: self.phone,
            address: self.address,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Order line joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    price: Price,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            price: row.price,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaidOrderTotalRow {
    created_at: DateTime<Utc>,
    total: Decimal,
}

const ORDER_COLUMNS: &str = "id, store_id, is_paid, phone, address, created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record an order and its lines in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a product id does not belong to
    /// the store.
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn create(&self, store: StoreId, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO catalog.customer_order (
                id, store_id, is_paid, phone, address, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(OrderId::generate())
        .bind(store)
        .bind(order.is_paid)
        .bind(&order.phone)
        .bind(&order.address)
        .bind(order.created_at)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(order.product_ids.len());
        for product_id in &order.product_ids {
            let item = sqlx::query_as::<_, OrderItemRow>(
                r"
                WITH inserted AS (
                    INSERT INTO catalog.order_item (id, order_id, product_id)
                    SELECT $1, $2, p.id FROM catalog.product p
                    WHERE p.id = $3 AND p.store_id = $4
                    RETURNING id, order_id, product_id
                )
                SELECT i.id, i.order_id, i.product_id,
                       p.name AS product_name, p.price
                FROM inserted i
                JOIN catalog.product p ON p.id = i.product_id
                ",
            )
            .bind(OrderItemId::generate())
            .bind(row.id)
            .bind(product_id)
            .bind(store)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;
            items.push(item.into());
        }

        tx.commit().await?;

        Ok(row.into_order(items))
    }

    /// List orders of a store with their lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM catalog.customer_order \
             WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = rows.iter().map(|r| r.id.as_uuid()).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_id,
                   p.name AS product_name, p.price
            FROM catalog.order_item oi
            JOIN catalog.product p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            ",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut items: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in item_rows {
            items.entry(item.order_id).or_default().push(item.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect())
    }

    /// Count paid orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_paid(&self, store: StoreId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM catalog.customer_order WHERE store_id = $1 AND is_paid = TRUE",
        )
        .bind(store)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Per-order totals of every paid order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn paid_totals(&self, store: StoreId) -> Result<Vec<PaidOrderTotal>, RepositoryError> {
        let rows = sqlx::query_as::<_, PaidOrderTotalRow>(
            r"
            SELECT o.created_at, COALESCE(SUM(p.price), 0) AS total
            FROM catalog.customer_order o
            LEFT JOIN catalog.order_item oi ON oi.order_id = o.id
            LEFT JOIN catalog.product p ON p.id = oi.product_id
            WHERE o.store_id = $1 AND o.is_paid = TRUE
            GROUP BY o.id, o.created_at
            ",
        )
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PaidOrderTotal {
                created_at: row.created_at,
                total: row.total,
            })
            .collect())
    }
}
