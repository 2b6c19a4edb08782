//! Category handlers.

use serde::Deserialize;

use courtside_core::{CategoryId, StoreId};

use crate::db::{Catalog, EntityRef};
use crate::error::AppError;
use crate::models::{Category, CategoryInput, CategoryWithBillboard, Principal};

use super::guard::{
    authorize_store_mutation, ensure_deletable, ensure_in_store, not_found, require_principal,
};
use super::validation::{Field, ValidationError, required_id, required_text};

/// Body of category create and update requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub billboard_id: Option<String>,
}

impl CategoryPayload {
    /// Validate in field order: name, billboard id.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self) -> Result<CategoryInput, ValidationError> {
        Ok(CategoryInput {
            name: required_text(self.name, Field::Name)?,
            billboard_id: required_id(self.billboard_id, Field::BillboardId)?,
        })
    }
}

async fn check_references(
    catalog: &dyn Catalog,
    store_id: StoreId,
    input: &CategoryInput,
) -> Result<(), AppError> {
    ensure_in_store(
        catalog,
        store_id,
        EntityRef::Billboard(input.billboard_id),
        Field::BillboardId,
    )
    .await
}

/// Categories of a store, alphabetical.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn list(catalog: &dyn Catalog, store_id: StoreId) -> Result<Vec<Category>, AppError> {
    Ok(catalog.list_categories(store_id).await?)
}

/// A category and its billboard, from any store.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn get(
    catalog: &dyn Catalog,
    id: CategoryId,
) -> Result<Option<CategoryWithBillboard>, AppError> {
    Ok(catalog.get_category(id).await?)
}

/// Create a category.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Validation`,
/// `AppError::Forbidden`, or a validation error for a foreign billboard.
pub async fn create(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    payload: CategoryPayload,
) -> Result<Category, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    check_references(catalog, store_id, &input).await?;
    Ok(catalog.create_category(store_id, &input).await?)
}

/// Replace a category's fields.
///
/// # Errors
///
/// As [`create`], plus `AppError::NotFound` if the category is not in the store.
pub async fn update(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: CategoryId,
    payload: CategoryPayload,
) -> Result<Category, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    check_references(catalog, store_id, &input).await?;
    catalog
        .update_category(store_id, id, &input)
        .await?
        .ok_or_else(|| not_found(EntityRef::Category(id)))
}

/// Delete a category no product is listed under.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Forbidden`,
/// `AppError::NotFound`, or `AppError::Conflict` while it is in use.
pub async fn delete(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: CategoryId,
) -> Result<Category, AppError> {
    let principal = require_principal(principal)?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    ensure_deletable(catalog, store_id, EntityRef::Category(id)).await?;
    catalog
        .delete_category(store_id, id)
        .await?
        .ok_or_else(|| not_found(EntityRef::Category(id)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courtside_core::UserId;

    use super::*;
    use crate::db::MemoryCatalog;
    use crate::models::BillboardInput;

    #[test]
    fn test_field_order() {
        let err = CategoryPayload {
            name: None,
            billboard_id: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Name is required");

        let err = CategoryPayload {
            name: Some("Jerseys".into()),
            billboard_id: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Billboard id is required");
    }

    #[tokio::test]
    async fn test_billboard_from_other_store_rejected() {
        let catalog = MemoryCatalog::new();
        let owner = Principal::new(UserId::parse("u1").unwrap());
        let mine = catalog.create_store(&owner.user_id, "S1").await.unwrap();
        let other = catalog.create_store(&owner.user_id, "S2").await.unwrap();
        let billboard = catalog
            .create_billboard(
                other.id,
                &BillboardInput {
                    label: "Other".into(),
                    image_url: "https://img.example/o.png".into(),
                },
            )
            .await
            .unwrap();

        let err = create(
            &catalog,
            Some(&owner),
            mine.id,
            CategoryPayload {
                name: Some("Jerseys".into()),
                billboard_id: Some(billboard.id.to_string()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Billboard id does not belong to this store");
        assert!(catalog.list_categories(mine.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_includes_billboard() {
        let catalog = MemoryCatalog::new();
        let owner = Principal::new(UserId::parse("u1").unwrap());
        let store = catalog.create_store(&owner.user_id, "S1").await.unwrap();
        let billboard = catalog
            .create_billboard(
                store.id,
                &BillboardInput {
                    label: "Finals".into(),
                    image_url: "https://img.example/f.png".into(),
                },
            )
            .await
            .unwrap();
        let category = create(
            &catalog,
            Some(&owner),
            store.id,
            CategoryPayload {
                name: Some("Jerseys".into()),
                billboard_id: Some(billboard.id.to_string()),
            },
        )
        .await
        .unwrap();

        let found = get(&catalog, category.id).await.unwrap().unwrap();
        assert_eq!(found.billboard.label, "Finals");
    }
}
