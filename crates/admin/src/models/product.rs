//! Product and product image domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courtside_core::{CategoryId, ColorId, ImageId, Price, ProductId, SizeId, StoreId, TeamId};

use super::{category::Category, color::Color, size::Size, team::Team};

/// A hosted product image. Owned by exactly one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Unique image ID.
    pub id: ImageId,
    /// Owning product.
    pub product_id: ProductId,
    /// URL returned by the image host.
    pub url: String,
    /// When the image row was created.
    pub created_at: DateTime<Utc>,
}

/// A catalog product together with its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning store.
    pub store_id: StoreId,
    /// Category the product is listed under.
    pub category_id: CategoryId,
    /// Product color.
    pub color_id: ColorId,
    /// Product size.
    pub size_id: SizeId,
    /// Team the jersey belongs to.
    pub team_id: TeamId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Long description.
    pub description: String,
    /// Shown on the storefront home page.
    pub is_featured: bool,
    /// Hidden from every listing without being deleted.
    pub is_archived: bool,
    /// Throwback jersey.
    pub is_retro: bool,
    /// Product images (unordered).
    pub images: Vec<Image>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A product with every referenced entity resolved, as served to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    /// The product and its images.
    #[serde(flatten)]
    pub product: Product,
    /// Resolved category.
    pub category: Category,
    /// Resolved size.
    pub size: Size,
    /// Resolved color.
    pub color: Color,
    /// Resolved team.
    pub team: Team,
}

/// Validated fields for creating or fully replacing a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Long description.
    pub description: String,
    /// Image URLs; replaces the whole image set on update.
    pub images: Vec<String>,
    /// Product color.
    pub color_id: ColorId,
    /// Category the product is listed under.
    pub category_id: CategoryId,
    /// Product size.
    pub size_id: SizeId,
    /// Team the jersey belongs to.
    pub team_id: TeamId,
    /// Featured flag.
    pub is_featured: bool,
    /// Archived flag.
    pub is_archived: bool,
    /// Retro flag.
    pub is_retro: bool,
}

/// Filter criteria for listing and counting products.
///
/// Archived products are never matched; there is deliberately no field to
/// opt back in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match.
    pub category_id: Option<CategoryId>,
    /// Exact color match.
    pub color_id: Option<ColorId>,
    /// Exact size match.
    pub size_id: Option<SizeId>,
    /// Exact team match.
    pub team_id: Option<TeamId>,
    /// Featured flag must equal this value.
    pub is_featured: Option<bool>,
    /// Retro flag must equal this value.
    pub is_retro: Option<bool>,
}

impl ProductFilter {
    /// Whether `product` passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        !product.is_archived
            && self.category_id.is_none_or(|id| product.category_id == id)
            && self.color_id.is_none_or(|id| product.color_id == id)
            && self.size_id.is_none_or(|id| product.size_id == id)
            && self.team_id.is_none_or(|id| product.team_id == id)
            && self.is_featured.is_none_or(|flag| product.is_featured == flag)
            && self.is_retro.is_none_or(|flag| product.is_retro == flag)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::generate(),
            store_id: StoreId::generate(),
            category_id: CategoryId::generate(),
            color_id: ColorId::generate(),
            size_id: SizeId::generate(),
            team_id: TeamId::generate(),
            name: "Home Jersey".to_string(),
            price: Price::from_cents(11_000).unwrap(),
            description: "Swingman".to_string(),
            is_featured: true,
            is_archived: false,
            is_retro: false,
            images: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_filter_matches_live_product() {
        assert!(ProductFilter::default().matches(&product()));
    }

    #[test]
    fn test_archived_never_matches() {
        let mut p = product();
        p.is_archived = true;
        assert!(!ProductFilter::default().matches(&p));
        let filter = ProductFilter {
            category_id: Some(p.category_id),
            is_featured: Some(true),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_reference_filters() {
        let p = product();
        let hit = ProductFilter {
            team_id: Some(p.team_id),
            size_id: Some(p.size_id),
            ..ProductFilter::default()
        };
        assert!(hit.matches(&p));
        let miss = ProductFilter {
            color_id: Some(ColorId::generate()),
            ..ProductFilter::default()
        };
        assert!(!miss.matches(&p));
    }

    #[test]
    fn test_flag_filters() {
        let p = product();
        let featured = ProductFilter {
            is_featured: Some(true),
            ..ProductFilter::default()
        };
        assert!(featured.matches(&p));
        let retro = ProductFilter {
            is_retro: Some(true),
            ..ProductFilter::default()
        };
        assert!(!retro.matches(&p));
        let not_retro = ProductFilter {
            is_retro: Some(false),
            ..ProductFilter::default()
        };
        assert!(not_retro.matches(&p));
    }
}
