//! Order listing for the store owner.

use rust_decimal::Decimal;
use serde::Serialize;

use courtside_core::StoreId;

use crate::db::Catalog;
use crate::error::AppError;
use crate::models::{Order, Principal};

use super::guard::{authorize_store_mutation, require_principal};

/// An order as shown in the orders table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    /// Comma-separated product names.
    pub products: String,
    /// Sum of the line item prices.
    pub total_price: Decimal,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            products: order.product_names(),
            total_price: order.total_price(),
            order,
        }
    }
}

/// Orders of a store the caller owns, newest first.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated` or `AppError::Forbidden`, and
/// `AppError::Database` if the lookup fails.
pub async fn list(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
) -> Result<Vec<OrderView>, AppError> {
    let principal = require_principal(principal)?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    let orders = catalog.list_orders(store_id).await?;
    Ok(orders.into_iter().map(OrderView::from).collect())
}
