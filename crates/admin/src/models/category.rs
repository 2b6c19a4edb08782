//! Category domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courtside_core::{BillboardId, CategoryId, StoreId};

use super::billboard::Billboard;

/// A product category, shown under a billboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Owning store.
    pub store_id: StoreId,
    /// Billboard displayed on the category page.
    pub billboard_id: BillboardId,
    /// Display name.
    pub name: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
    /// When the category was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A category together with its billboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithBillboard {
    /// The category itself.
    #[serde(flatten)]
    pub category: Category,
    /// The referenced billboard.
    pub billboard: Billboard,
}

/// Validated fields for creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Billboard displayed on the category page.
    pub billboard_id: BillboardId,
}
