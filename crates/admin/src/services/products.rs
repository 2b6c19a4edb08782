//! Product handlers.
//!
//! A product references a category, color, size and team of its own store and
//! owns its image set. Create and update write the product and the full image
//! set atomically; an update replaces every image.

use rust_decimal::Decimal;
use serde::Deserialize;

use courtside_core::{ProductId, StoreId};

use crate::db::{Catalog, EntityRef};
use crate::error::AppError;
use crate::models::{Principal, Product, ProductDetail, ProductFilter, ProductInput};

use super::guard::{
    authorize_store_mutation, ensure_deletable, ensure_in_store, not_found, require_principal,
};
use super::validation::{
    Field, ValidationError, required_id, required_image_urls, required_price, required_text,
};

/// One image in a product payload, as returned by the upload widget.
#[derive(Debug, Default, Deserialize)]
pub struct ImagePayload {
    pub url: Option<String>,
}

/// Body of product create and update requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub images: Option<Vec<ImagePayload>>,
    pub color_id: Option<String>,
    pub category_id: Option<String>,
    pub size_id: Option<String>,
    pub team_id: Option<String>,
    pub is_featured: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_retro: Option<bool>,
}

impl ProductPayload {
    /// Validate in field order: name, price, description, images, color id,
    /// category id, size id, team id. Flags default to `false`.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self) -> Result<ProductInput, ValidationError> {
        Ok(ProductInput {
            name: required_text(self.name, Field::Name)?,
            price: required_price(self.price)?,
            description: required_text(self.description, Field::Description)?,
            images: required_image_urls(
                self.images
                    .map(|images| images.into_iter().map(|image| image.url).collect()),
            )?,
            color_id: required_id(self.color_id, Field::ColorId)?,
            category_id: required_id(self.category_id, Field::CategoryId)?,
            size_id: required_id(self.size_id, Field::SizeId)?,
            team_id: required_id(self.team_id, Field::TeamId)?,
            is_featured: self.is_featured.unwrap_or(false),
            is_archived: self.is_archived.unwrap_or(false),
            is_retro: self.is_retro.unwrap_or(false),
        })
    }
}

/// Query string of product list and count requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category_id: Option<String>,
    pub color_id: Option<String>,
    pub size_id: Option<String>,
    pub team_id: Option<String>,
    pub is_featured: Option<String>,
    pub is_retro: Option<String>,
}

impl ProductQuery {
    /// Parse into a filter. Empty parameters are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a malformed id or flag.
    pub fn into_filter(self) -> Result<ProductFilter, AppError> {
        Ok(ProductFilter {
            category_id: optional_id("categoryId", self.category_id)?,
            color_id: optional_id("colorId", self.color_id)?,
            size_id: optional_id("sizeId", self.size_id)?,
            team_id: optional_id("teamId", self.team_id)?,
            is_featured: parse_flag("isFeatured", self.is_featured)?,
            is_retro: parse_flag("isRetro", self.is_retro)?,
        })
    }
}

fn optional_id<T: From<uuid::Uuid>>(
    name: &str,
    value: Option<String>,
) -> Result<Option<T>, AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => courtside_core::parse_id(raw)
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {name}"))),
    }
}

/// Parse a boolean query flag.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for anything other than the accepted
/// spellings of true and false.
pub fn parse_flag(name: &str, value: Option<String>) -> Result<Option<bool>, AppError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(AppError::BadRequest(format!("Invalid {name}"))),
    }
}

async fn check_references(
    catalog: &dyn Catalog,
    store_id: StoreId,
    input: &ProductInput,
) -> Result<(), AppError> {
    let references = [
        (EntityRef::Color(input.color_id), Field::ColorId),
        (EntityRef::Category(input.category_id), Field::CategoryId),
        (EntityRef::Size(input.size_id), Field::SizeId),
        (EntityRef::Team(input.team_id), Field::TeamId),
    ];
    for (entity, field) in references {
        ensure_in_store(catalog, store_id, entity, field).await?;
    }
    Ok(())
}

/// Non-archived products matching `filter`, newest first.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn list(
    catalog: &dyn Catalog,
    store_id: StoreId,
    filter: &ProductFilter,
) -> Result<Vec<ProductDetail>, AppError> {
    Ok(catalog.list_products(store_id, filter).await?)
}

/// Number of non-archived products matching `filter`.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn count(
    catalog: &dyn Catalog,
    store_id: StoreId,
    filter: &ProductFilter,
) -> Result<i64, AppError> {
    Ok(catalog.count_products(store_id, filter).await?)
}

/// A product with images and references, from any store.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn get(catalog: &dyn Catalog, id: ProductId) -> Result<Option<ProductDetail>, AppError> {
    Ok(catalog.get_product(id).await?)
}

/// Create a product with its images.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Validation`,
/// `AppError::Forbidden`, or a validation error for a foreign reference.
pub async fn create(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    payload: ProductPayload,
) -> Result<Product, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    check_references(catalog, store_id, &input).await?;

    let product = catalog.create_product(store_id, &input).await?;
    tracing::info!(
        product_id = %product.id,
        store_id = %store_id,
        images = product.images.len(),
        "Product created"
    );
    Ok(product)
}

/// Replace a product's fields and its whole image set.
///
/// # Errors
///
/// As [`create`], plus `AppError::NotFound` if the product is not in the store.
pub async fn update(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: ProductId,
    payload: ProductPayload,
) -> Result<Product, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    check_references(catalog, store_id, &input).await?;

    let product = catalog
        .update_product(store_id, id, &input)
        .await?
        .ok_or_else(|| not_found(EntityRef::Product(id)))?;
    tracing::info!(
        product_id = %product.id,
        images = product.images.len(),
        "Product updated"
    );
    Ok(product)
}

/// Delete a product and its images. Products on orders are kept.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Forbidden`,
/// `AppError::NotFound`, or `AppError::Conflict` while orders reference it.
pub async fn delete(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: ProductId,
) -> Result<Product, AppError> {
    let principal = require_principal(principal)?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    ensure_deletable(catalog, store_id, EntityRef::Product(id)).await?;
    catalog
        .delete_product(store_id, id)
        .await?
        .ok_or_else(|| not_found(EntityRef::Product(id)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courtside_core::{CategoryId, ColorId, SizeId, TeamId};

    use super::*;

    fn full() -> ProductPayload {
        ProductPayload {
            name: Some("Home Jersey".into()),
            price: Some(Decimal::new(11_000, 2)),
            description: Some("Swingman cut".into()),
            images: Some(vec![ImagePayload {
                url: Some("https://img.example/a.png".into()),
            }]),
            color_id: Some(ColorId::generate().to_string()),
            category_id: Some(CategoryId::generate().to_string()),
            size_id: Some(SizeId::generate().to_string()),
            team_id: Some(TeamId::generate().to_string()),
            is_featured: None,
            is_archived: None,
            is_retro: Some(true),
        }
    }

    #[test]
    fn test_first_missing_field_reported() {
        let cases: [(fn(&mut ProductPayload), &str); 8] = [
            (|p| p.name = None, "Name is required"),
            (|p| p.price = None, "Price is required"),
            (|p| p.description = None, "Description is required"),
            (|p| p.images = None, "Images are required"),
            (|p| p.color_id = None, "Color id is required"),
            (|p| p.category_id = None, "Category id is required"),
            (|p| p.size_id = None, "Size id is required"),
            (|p| p.team_id = None, "Team id is required"),
        ];
        for (strip, expected) in cases {
            let mut payload = full();
            strip(&mut payload);
            assert_eq!(payload.validate().unwrap_err().to_string(), expected);
        }
    }

    #[test]
    fn test_earlier_field_wins() {
        let payload = ProductPayload {
            description: Some("only a description".into()),
            ..ProductPayload::default()
        };
        assert_eq!(
            payload.validate().unwrap_err().to_string(),
            "Name is required"
        );
    }

    #[test]
    fn test_zero_price_is_required() {
        let mut payload = full();
        payload.price = Some(Decimal::ZERO);
        assert_eq!(
            payload.validate().unwrap_err().to_string(),
            "Price is required"
        );
    }

    #[test]
    fn test_blank_image_url() {
        let mut payload = full();
        payload.images = Some(vec![ImagePayload { url: None }]);
        assert_eq!(
            payload.validate().unwrap_err().to_string(),
            "Image url is required"
        );
    }

    #[test]
    fn test_flags_default_false() {
        let input = full().validate().unwrap();
        assert!(!input.is_featured);
        assert!(!input.is_archived);
        assert!(input.is_retro);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("isFeatured", None).unwrap(), None);
        assert_eq!(parse_flag("isFeatured", Some(String::new())).unwrap(), None);
        assert_eq!(parse_flag("isFeatured", Some("1".into())).unwrap(), Some(true));
        assert_eq!(parse_flag("isFeatured", Some("TRUE".into())).unwrap(), Some(true));
        assert_eq!(parse_flag("isRetro", Some("false".into())).unwrap(), Some(false));
        assert!(matches!(
            parse_flag("isRetro", Some("maybe".into())),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_query_into_filter() {
        let category = CategoryId::generate();
        let filter = ProductQuery {
            category_id: Some(category.to_string()),
            color_id: Some(String::new()),
            is_featured: Some("yes".into()),
            ..ProductQuery::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.category_id, Some(category));
        assert_eq!(filter.color_id, None);
        assert_eq!(filter.is_featured, Some(true));

        let err = ProductQuery {
            team_id: Some("not-a-team".into()),
            ..ProductQuery::default()
        }
        .into_filter()
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid teamId");
    }
}
