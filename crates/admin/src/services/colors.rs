//! Color handlers.

use serde::Deserialize;

use courtside_core::{ColorId, StoreId};

use crate::db::{Catalog, EntityRef};
use crate::error::AppError;
use crate::models::{Color, ColorInput, Principal};

use super::guard::{authorize_store_mutation, ensure_deletable, not_found, require_principal};
use super::validation::{Field, ValidationError, required_text};

/// Body of color create and update requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPayload {
    pub name: Option<String>,
    /// Display value, typically a hex code.
    pub value: Option<String>,
}

impl ColorPayload {
    /// Validate in field order: name, value.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self) -> Result<ColorInput, ValidationError> {
        Ok(ColorInput {
            name: required_text(self.name, Field::Name)?,
            value: required_text(self.value, Field::Value)?,
        })
    }
}

/// Colors of a store, alphabetical.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn list(catalog: &dyn Catalog, store_id: StoreId) -> Result<Vec<Color>, AppError> {
    Ok(catalog.list_colors(store_id).await?)
}

/// A color by id, from any store.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn get(catalog: &dyn Catalog, id: ColorId) -> Result<Option<Color>, AppError> {
    Ok(catalog.get_color(id).await?)
}

/// Create a color.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Validation` or
/// `AppError::Forbidden`, in that order of precedence.
pub async fn create(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    payload: ColorPayload,
) -> Result<Color, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    Ok(catalog.create_color(store_id, &input).await?)
}

/// Replace a color's fields.
///
/// # Errors
///
/// As [`create`], plus `AppError::NotFound` if the color is not in the store.
pub async fn update(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: ColorId,
    payload: ColorPayload,
) -> Result<Color, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    catalog
        .update_color(store_id, id, &input)
        .await?
        .ok_or_else(|| not_found(EntityRef::Color(id)))
}

/// Delete a color no product or team uses.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Forbidden`,
/// `AppError::NotFound`, or `AppError::Conflict` while it is in use.
pub async fn delete(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: ColorId,
) -> Result<Color, AppError> {
    let principal = require_principal(principal)?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    ensure_deletable(catalog, store_id, EntityRef::Color(id)).await?;
    catalog
        .delete_color(store_id, id)
        .await?
        .ok_or_else(|| not_found(EntityRef::Color(id)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courtside_core::UserId;

    use super::*;
    use crate::db::MemoryCatalog;

    #[test]
    fn test_name_checked_before_value() {
        let err = ColorPayload::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[tokio::test]
    async fn test_non_owner_cannot_delete() {
        let catalog = MemoryCatalog::new();
        let owner = Principal::new(UserId::parse("u1").unwrap());
        let store = catalog.create_store(&owner.user_id, "S1").await.unwrap();
        let color = create(
            &catalog,
            Some(&owner),
            store.id,
            ColorPayload {
                name: Some("Green".into()),
                value: Some("#007A33".into()),
            },
        )
        .await
        .unwrap();

        let intruder = Principal::new(UserId::parse("u2").unwrap());
        let err = delete(&catalog, Some(&intruder), store.id, color.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert!(catalog.get_color(color.id).await.unwrap().is_some());

        delete(&catalog, Some(&owner), store.id, color.id)
            .await
            .unwrap();
        assert!(catalog.get_color(color.id).await.unwrap().is_none());
    }
}
