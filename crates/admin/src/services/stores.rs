//! Store (tenant) handlers.

use serde::Deserialize;

use courtside_core::StoreId;

use crate::db::{Catalog, EntityRef};
use crate::error::AppError;
use crate::models::{Principal, Store};

use super::guard::{authorize_store_mutation, require_principal};
use super::validation::{Field, ValidationError, required_text};

/// Body of store create and rename requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePayload {
    pub name: Option<String>,
}

impl StorePayload {
    /// Validate into a store name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Required(Name)` for a missing or blank name.
    pub fn validate(self) -> Result<String, ValidationError> {
        required_text(self.name, Field::Name)
    }
}

/// Stores owned by the caller, oldest first.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated` without a principal.
pub async fn list(catalog: &dyn Catalog, principal: Option<&Principal>) -> Result<Vec<Store>, AppError> {
    let principal = require_principal(principal)?;
    Ok(catalog.list_stores(&principal.user_id).await?)
}

/// The store if the caller owns it, otherwise `None`.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated` without a principal.
pub async fn get(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
) -> Result<Option<Store>, AppError> {
    let principal = require_principal(principal)?;
    Ok(catalog
        .get_store(store_id)
        .await?
        .filter(|store| store.is_owned_by(&principal.user_id)))
}

/// Create a store owned by the caller.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated` without a principal and
/// `AppError::Validation` for a missing name.
pub async fn create(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    payload: StorePayload,
) -> Result<Store, AppError> {
    let principal = require_principal(principal)?;
    let name = payload.validate()?;
    let store = catalog.create_store(&principal.user_id, &name).await?;
    tracing::info!(store_id = %store.id, user_id = %principal.user_id, "Store created");
    Ok(store)
}

/// Rename a store the caller owns.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Validation` or
/// `AppError::Forbidden`, in that order of precedence.
pub async fn rename(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    payload: StorePayload,
) -> Result<Store, AppError> {
    let principal = require_principal(principal)?;
    let name = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    catalog
        .rename_store(store_id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_string()))
}

/// Delete a store the caller owns. Stores with any catalog or order rows are
/// kept.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Forbidden`, or
/// `AppError::Conflict` while the store still has children.
pub async fn delete(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
) -> Result<Store, AppError> {
    let principal = require_principal(principal)?;
    authorize_store_mutation(catalog, principal, store_id).await?;

    let children = catalog.usage_count(EntityRef::Store(store_id)).await?;
    if children > 0 {
        return Err(AppError::Conflict(format!(
            "Store still has {children} record(s); remove them first"
        )));
    }

    let store = catalog
        .delete_store(store_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;
    tracing::info!(store_id = %store.id, "Store deleted");
    Ok(store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courtside_core::UserId;

    use super::*;
    use crate::db::MemoryCatalog;
    use crate::models::SizeInput;

    fn principal(user: &str) -> Principal {
        Principal::new(UserId::parse(user).unwrap())
    }

    fn named(name: &str) -> StorePayload {
        StorePayload {
            name: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_own_stores() {
        let catalog = MemoryCatalog::new();
        let u1 = principal("u1");
        create(&catalog, Some(&u1), named("First")).await.unwrap();
        create(&catalog, Some(&u1), named("Second")).await.unwrap();
        create(&catalog, Some(&principal("u2")), named("Theirs"))
            .await
            .unwrap();

        let names: Vec<String> = list(&catalog, Some(&u1))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["First".to_string(), "Second".to_string()]);
    }

    #[tokio::test]
    async fn test_unauthenticated_before_validation() {
        let catalog = MemoryCatalog::new();
        let err = create(&catalog, None, StorePayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
        let err = create(&catalog, Some(&principal("u1")), StorePayload::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[tokio::test]
    async fn test_get_hides_foreign_store() {
        let catalog = MemoryCatalog::new();
        let store = create(&catalog, Some(&principal("u1")), named("S1"))
            .await
            .unwrap();
        assert!(
            get(&catalog, Some(&principal("u1")), store.id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            get(&catalog, Some(&principal("u2")), store.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_rename_by_non_owner_forbidden() {
        let catalog = MemoryCatalog::new();
        let store = create(&catalog, Some(&principal("u1")), named("S1"))
            .await
            .unwrap();
        let err = rename(&catalog, Some(&principal("u2")), store.id, named("Mine"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert_eq!(
            catalog.get_store(store.id).await.unwrap().unwrap().name,
            "S1"
        );
    }

    #[tokio::test]
    async fn test_delete_non_empty_store_conflicts() {
        let catalog = MemoryCatalog::new();
        let owner = principal("u1");
        let store = create(&catalog, Some(&owner), named("S1")).await.unwrap();
        catalog
            .create_size(
                store.id,
                &SizeInput {
                    name: "Small".to_string(),
                    value: "S".to_string(),
                },
            )
            .await
            .unwrap();

        let err = delete(&catalog, Some(&owner), store.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let empty = create(&catalog, Some(&owner), named("S2")).await.unwrap();
        let deleted = delete(&catalog, Some(&owner), empty.id).await.unwrap();
        assert_eq!(deleted.id, empty.id);
    }
}
