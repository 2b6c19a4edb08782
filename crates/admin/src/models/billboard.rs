//! Billboard domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courtside_core::{BillboardId, StoreId};

/// A promotional banner referenced by categories and teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billboard {
    /// Unique billboard ID.
    pub id: BillboardId,
    /// Owning store.
    pub store_id: StoreId,
    /// Banner headline.
    pub label: String,
    /// Hosted banner image.
    pub image_url: String,
    /// When the billboard was created.
    pub created_at: DateTime<Utc>,
    /// When the billboard was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or replacing a billboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillboardInput {
    /// Banner headline.
    pub label: String,
    /// Hosted banner image.
    pub image_url: String,
}
