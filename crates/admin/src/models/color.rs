//! Color domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courtside_core::{ColorId, StoreId};

/// A product or team color (value is usually a hex code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    /// Unique color ID.
    pub id: ColorId,
    /// Owning store.
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// Display value, e.g. `#1D428A`.
    pub value: String,
    /// When the color was created.
    pub created_at: DateTime<Utc>,
    /// When the color was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or replacing a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorInput {
    /// Display name.
    pub name: String,
    /// Display value.
    pub value: String,
}
