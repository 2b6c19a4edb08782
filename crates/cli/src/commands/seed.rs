//! Seed demo orders so the overview page has something to chart.
//!
//! Orders are spread across the months of the current year up to today, each
//! with one to three of the store's non-archived products. Every fourth order
//! is left unpaid.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use courtside_admin::db::{Catalog, PgCatalog};
use courtside_admin::models::{NewOrder, ProductFilter};
use courtside_core::{ProductId, StoreId};

use super::{CommandError, connect};

/// Create `count` demo orders for `store`.
///
/// # Errors
///
/// Returns `CommandError` if the store id is invalid, the store has no
/// products, or an insert fails.
pub async fn orders(store: &str, count: usize) -> Result<(), CommandError> {
    let store_id: StoreId = courtside_core::parse_id(store)
        .map_err(|e| CommandError::InvalidArgument(format!("store: {e}")))?;

    let catalog = PgCatalog::new(connect().await?);
    if catalog.get_store(store_id).await?.is_none() {
        return Err(CommandError::InvalidArgument(format!(
            "store {store_id} does not exist"
        )));
    }

    let products: Vec<ProductId> = catalog
        .list_products(store_id, &ProductFilter::default())
        .await?
        .into_iter()
        .map(|detail| detail.product.id)
        .collect();
    if products.is_empty() {
        return Err(CommandError::InvalidArgument(
            "store has no products to order".to_string(),
        ));
    }

    let planned = plan_orders(&products, count, Utc::now());
    for order in &planned {
        catalog.create_order(store_id, order).await?;
    }

    tracing::info!(
        store_id = %store_id,
        orders = planned.len(),
        paid = planned.iter().filter(|o| o.is_paid).count(),
        "Seeded demo orders"
    );
    Ok(())
}

/// Lay out `count` orders over the months of `now`'s year that have started.
/// Without products there is nothing to order.
fn plan_orders(products: &[ProductId], count: usize, now: DateTime<Utc>) -> Vec<NewOrder> {
    if products.is_empty() {
        return Vec::new();
    }
    let months = now.month() as usize;
    (0..count)
        .map(|i| {
            let lines = 1 + i % 3;
            let product_ids = (0..lines)
                .filter_map(|offset| products.get((i + offset) % products.len()).copied())
                .collect();
            let month = u32::try_from(i % months).unwrap_or(0) + 1;
            let created_at = Utc
                .with_ymd_and_hms(now.year(), month, 1, 12, 0, 0)
                .single()
                .unwrap_or(now)
                .min(now);
            NewOrder {
                is_paid: i % 4 != 3,
                phone: format!("555-{:04}", i % 10_000),
                address: format!("{} Court St", i + 1),
                product_ids,
                created_at,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_spreads_over_elapsed_months() {
        let products = [ProductId::generate(), ProductId::generate()];
        let now = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();
        let plan = plan_orders(&products, 8, now);

        assert_eq!(plan.len(), 8);
        assert!(plan.iter().all(|o| o.created_at <= now));
        assert!(plan.iter().all(|o| (1..=3).contains(&o.created_at.month())));
        assert!(plan.iter().all(|o| (1..=3).contains(&o.product_ids.len())));
        assert_eq!(plan.iter().filter(|o| !o.is_paid).count(), 2);
    }

    #[test]
    fn test_plan_only_uses_given_products() {
        let products = [ProductId::generate()];
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let plan = plan_orders(&products, 3, now);
        assert!(
            plan.iter()
                .flat_map(|o| o.product_ids.iter())
                .all(|id| Some(id) == products.first())
        );
    }

    #[test]
    fn test_plan_without_products_is_empty() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
        assert!(plan_orders(&[], 5, now).is_empty());
    }
}
