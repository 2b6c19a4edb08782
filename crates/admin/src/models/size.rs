//! Size domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courtside_core::{SizeId, StoreId};

/// A product size (e.g. name "Large", value "L").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    /// Unique size ID.
    pub id: SizeId,
    /// Owning store.
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// Short display value.
    pub value: String,
    /// When the size was created.
    pub created_at: DateTime<Utc>,
    /// When the size was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or replacing a size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeInput {
    /// Display name.
    pub name: String,
    /// Short display value.
    pub value: String,
}
