//! Team domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courtside_core::{BillboardId, ColorId, Conference, StoreId, TeamId};

/// A team whose jerseys the store sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Unique team ID.
    pub id: TeamId,
    /// Owning store.
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// Hosted team logo.
    pub image_url: String,
    /// Billboard displayed on the team page.
    pub billboard_id: BillboardId,
    /// Primary team color.
    pub primary_color_id: ColorId,
    /// Secondary team color.
    pub secondary_color_id: ColorId,
    /// Conference label (`East` / `West`).
    pub conference: Conference,
    /// When the team was created.
    pub created_at: DateTime<Utc>,
    /// When the team was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or replacing a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamInput {
    /// Display name.
    pub name: String,
    /// Hosted team logo.
    pub image_url: String,
    /// Billboard displayed on the team page.
    pub billboard_id: BillboardId,
    /// Primary team color.
    pub primary_color_id: ColorId,
    /// Secondary team color.
    pub secondary_color_id: ColorId,
    /// Conference label.
    pub conference: Conference,
}
