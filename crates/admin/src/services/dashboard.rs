//! Overview aggregates for the dashboard home page.
//!
//! Revenue counts only paid orders. Each order item is one unit, so an
//! order's revenue is the sum of its referenced products' prices.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use courtside_core::StoreId;

use crate::db::{Catalog, PaidOrderTotal};
use crate::error::AppError;
use crate::models::{Principal, ProductFilter};

use super::guard::{authorize_store_mutation, require_principal};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One bar of the revenue graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphPoint {
    /// Short month name.
    pub name: &'static str,
    /// Paid revenue for the month.
    pub total: Decimal,
}

/// Aggregates shown on the overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_revenue: Decimal,
    pub sales_count: i64,
    pub stock_count: i64,
    pub graph_revenue: Vec<GraphPoint>,
}

/// Sum of every paid order total.
#[must_use]
pub fn total_revenue(totals: &[PaidOrderTotal]) -> Decimal {
    totals.iter().map(|order| order.total).sum()
}

/// Paid revenue per calendar month of `year`, all twelve months present.
#[must_use]
pub fn revenue_graph(totals: &[PaidOrderTotal], year: i32) -> Vec<GraphPoint> {
    let mut graph: Vec<GraphPoint> = MONTHS
        .iter()
        .map(|name| GraphPoint {
            name,
            total: Decimal::ZERO,
        })
        .collect();
    for order in totals.iter().filter(|o| o.created_at.year() == year) {
        if let Some(point) = usize::try_from(order.created_at.month0())
            .ok()
            .and_then(|month| graph.get_mut(month))
        {
            point.total += order.total;
        }
    }
    graph
}

/// Build the overview for a store the caller owns.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated` or `AppError::Forbidden`, and
/// `AppError::Database` if a lookup fails.
pub async fn overview(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
) -> Result<Overview, AppError> {
    let principal = require_principal(principal)?;
    authorize_store_mutation(catalog, principal, store_id).await?;

    let totals = catalog.paid_order_totals(store_id).await?;
    let sales_count = catalog.count_paid_orders(store_id).await?;
    let stock_count = catalog
        .count_products(store_id, &ProductFilter::default())
        .await?;

    Ok(Overview {
        total_revenue: total_revenue(&totals),
        sales_count,
        stock_count,
        graph_revenue: revenue_graph(&totals, Utc::now().year()),
    })
}
