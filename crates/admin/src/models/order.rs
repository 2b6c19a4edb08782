//! Order domain types.
//!
//! Orders are written by the storefront checkout; the dashboard only reads
//! them. Line items carry no quantity - each item is one unit of a product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use courtside_core::{OrderId, OrderItemId, Price, ProductId, StoreId};

/// One line of an order, joined with the product it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Unique line ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Purchased product.
    pub product_id: ProductId,
    /// Product name at read time.
    pub product_name: String,
    /// Product price at read time.
    pub price: Price,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Store the order was placed in.
    pub store_id: StoreId,
    /// Whether payment has been captured.
    pub is_paid: bool,
    /// Customer phone number.
    pub phone: String,
    /// Shipping address.
    pub address: String,
    /// Line items.
    pub items: Vec<OrderItem>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of the referenced products' prices. Computed, never stored.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(|item| item.price.amount()).sum()
    }

    /// Comma-separated product names, as shown in the orders table.
    #[must_use]
    pub fn product_names(&self) -> String {
        self.items
            .iter()
            .map(|item| item.product_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Fields for recording a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Whether payment has been captured.
    pub is_paid: bool,
    /// Customer phone number.
    pub phone: String,
    /// Shipping address.
    pub address: String,
    /// One entry per purchased unit.
    pub product_ids: Vec<ProductId>,
    /// Placement time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(order_id: OrderId, name: &str, cents: i64) -> OrderItem {
        OrderItem {
            id: OrderItemId::generate(),
            order_id,
            product_id: ProductId::generate(),
            product_name: name.to_string(),
            price: Price::from_cents(cents).unwrap(),
        }
    }

    #[test]
    fn test_total_and_names() {
        let id = OrderId::generate();
        let now = Utc::now();
        let order = Order {
            id,
            store_id: StoreId::generate(),
            is_paid: true,
            phone: "555-0100".to_string(),
            address: "1 Court St".to_string(),
            items: vec![item(id, "Home", 10_000), item(id, "Away", 2_550)],
            created_at: now,
            updated_at: now,
        };
        assert_eq!(order.total_price(), Decimal::new(12_550, 2));
        assert_eq!(order.product_names(), "Home, Away");
    }

    #[test]
    fn test_empty_order_totals_zero() {
        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            store_id: StoreId::generate(),
            is_paid: false,
            phone: String::new(),
            address: String::new(),
            items: vec![],
            created_at: now,
            updated_at: now,
        };
        assert_eq!(order.total_price(), Decimal::ZERO);
        assert_eq!(order.product_names(), "");
    }
}
