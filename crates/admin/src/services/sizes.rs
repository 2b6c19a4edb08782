//! Size handlers.

use serde::Deserialize;

use courtside_core::{SizeId, StoreId};

use crate::db::{Catalog, EntityRef};
use crate::error::AppError;
use crate::models::{Principal, Size, SizeInput};

use super::guard::{authorize_store_mutation, ensure_deletable, not_found, require_principal};
use super::validation::{Field, ValidationError, required_text};

/// Body of size create and update requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePayload {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl SizePayload {
    /// Validate in field order: name, value.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self) -> Result<SizeInput, ValidationError> {
        Ok(SizeInput {
            name: required_text(self.name, Field::Name)?,
            value: required_text(self.value, Field::Value)?,
        })
    }
}

/// Sizes of a store, alphabetical.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn list(catalog: &dyn Catalog, store_id: StoreId) -> Result<Vec<Size>, AppError> {
    Ok(catalog.list_sizes(store_id).await?)
}

/// A size by id, from any store.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn get(catalog: &dyn Catalog, id: SizeId) -> Result<Option<Size>, AppError> {
    Ok(catalog.get_size(id).await?)
}

/// Create a size.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Validation` or
/// `AppError::Forbidden`, in that order of precedence.
pub async fn create(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    payload: SizePayload,
) -> Result<Size, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    Ok(catalog.create_size(store_id, &input).await?)
}

/// Replace a size's fields.
///
/// # Errors
///
/// As [`create`], plus `AppError::NotFound` if the size is not in the store.
pub async fn update(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: SizeId,
    payload: SizePayload,
) -> Result<Size, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    catalog
        .update_size(store_id, id, &input)
        .await?
        .ok_or_else(|| not_found(EntityRef::Size(id)))
}

/// Delete a size no product uses.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Forbidden`,
/// `AppError::NotFound`, or `AppError::Conflict` while it is in use.
pub async fn delete(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: SizeId,
) -> Result<Size, AppError> {
    let principal = require_principal(principal)?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    ensure_deletable(catalog, store_id, EntityRef::Size(id)).await?;
    catalog
        .delete_size(store_id, id)
        .await?
        .ok_or_else(|| not_found(EntityRef::Size(id)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courtside_core::UserId;

    use super::*;
    use crate::db::MemoryCatalog;

    fn payload(name: &str, value: &str) -> SizePayload {
        SizePayload {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }

    #[test]
    fn test_value_required() {
        let err = SizePayload {
            name: Some("Large".into()),
            value: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Value is required");
    }

    #[tokio::test]
    async fn test_listed_alphabetically() {
        let catalog = MemoryCatalog::new();
        let owner = Principal::new(UserId::parse("u1").unwrap());
        let store = catalog.create_store(&owner.user_id, "S1").await.unwrap();
        for (name, value) in [("Medium", "M"), ("Large", "L"), ("Small", "S")] {
            create(&catalog, Some(&owner), store.id, payload(name, value))
                .await
                .unwrap();
        }

        let names: Vec<String> = list(&catalog, store.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Large", "Medium", "Small"]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_not_found() {
        let catalog = MemoryCatalog::new();
        let owner = Principal::new(UserId::parse("u1").unwrap());
        let store = catalog.create_store(&owner.user_id, "S1").await.unwrap();
        let err = update(
            &catalog,
            Some(&owner),
            store.id,
            SizeId::generate(),
            payload("XL", "XL"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
