//! Authentication and store ownership checks.
//!
//! Mutations run these in a fixed order: authenticated principal (401),
//! payload validation (400), store ownership (403), same-store references
//! (400), then the write.

use courtside_core::StoreId;

use crate::db::{Catalog, EntityRef};
use crate::error::AppError;
use crate::models::{Principal, Store};

use super::validation::{Field, ValidationError};

/// Require an authenticated principal.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated` if there is none.
pub const fn require_principal(principal: Option<&Principal>) -> Result<&Principal, AppError> {
    match principal {
        Some(principal) => Ok(principal),
        None => Err(AppError::Unauthenticated),
    }
}

/// Confirm `principal` owns `store_id` and return the store.
///
/// A store that does not exist is indistinguishable from one owned by
/// somebody else.
///
/// # Errors
///
/// Returns `AppError::Forbidden` if the store is missing or not owned by the
/// principal, and `AppError::Database` if the lookup fails.
pub async fn authorize_store_mutation(
    catalog: &dyn Catalog,
    principal: &Principal,
    store_id: StoreId,
) -> Result<Store, AppError> {
    match catalog.get_store(store_id).await? {
        Some(store) if store.is_owned_by(&principal.user_id) => Ok(store),
        _ => {
            tracing::warn!(
                store_id = %store_id,
                user_id = %principal.user_id,
                "Store mutation denied"
            );
            Err(AppError::Forbidden)
        }
    }
}

/// Confirm a referenced entity belongs to `store_id`.
///
/// # Errors
///
/// Returns a validation error naming `field` if it does not.
pub async fn ensure_in_store(
    catalog: &dyn Catalog,
    store_id: StoreId,
    entity: EntityRef,
    field: Field,
) -> Result<(), AppError> {
    if catalog.reference_in_store(store_id, entity).await? {
        Ok(())
    } else {
        Err(ValidationError::foreign_reference(field).into())
    }
}

/// Confirm an entity exists in `store_id` and nothing references it.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the entity is not in the store and
/// `AppError::Conflict` if it is still referenced.
pub async fn ensure_deletable(
    catalog: &dyn Catalog,
    store_id: StoreId,
    entity: EntityRef,
) -> Result<(), AppError> {
    if !catalog.reference_in_store(store_id, entity).await? {
        return Err(not_found(entity));
    }
    let usage = catalog.usage_count(entity).await?;
    if usage > 0 {
        return Err(AppError::Conflict(format!(
            "{} is in use by {usage} other record(s)",
            entity.label()
        )));
    }
    Ok(())
}

/// The 404 for an entity missing from its store.
#[must_use]
pub fn not_found(entity: EntityRef) -> AppError {
    AppError::NotFound(format!("{} not found", entity.label()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courtside_core::{SizeId, UserId};

    use super::*;
    use crate::db::MemoryCatalog;
    use crate::models::SizeInput;

    fn principal(user: &str) -> Principal {
        Principal::new(UserId::parse(user).unwrap())
    }

    #[test]
    fn test_require_principal() {
        assert!(matches!(
            require_principal(None),
            Err(AppError::Unauthenticated)
        ));
        let p = principal("u1");
        assert_eq!(require_principal(Some(&p)).unwrap(), &p);
    }

    #[tokio::test]
    async fn test_owner_passes_other_user_forbidden() {
        let catalog = MemoryCatalog::new();
        let owner = principal("u1");
        let store = catalog.create_store(&owner.user_id, "S1").await.unwrap();

        let found = authorize_store_mutation(&catalog, &owner, store.id)
            .await
            .unwrap();
        assert_eq!(found.id, store.id);

        let err = authorize_store_mutation(&catalog, &principal("u2"), store.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_missing_store_forbidden() {
        let catalog = MemoryCatalog::new();
        let err = authorize_store_mutation(&catalog, &principal("u1"), StoreId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_ensure_in_store_and_deletable() {
        let catalog = MemoryCatalog::new();
        let owner = principal("u1");
        let store = catalog.create_store(&owner.user_id, "S1").await.unwrap();
        let other = catalog.create_store(&owner.user_id, "S2").await.unwrap();
        let size = catalog
            .create_size(
                store.id,
                &SizeInput {
                    name: "Small".to_string(),
                    value: "S".to_string(),
                },
            )
            .await
            .unwrap();

        ensure_in_store(&catalog, store.id, EntityRef::Size(size.id), Field::SizeId)
            .await
            .unwrap();
        let err = ensure_in_store(&catalog, other.id, EntityRef::Size(size.id), Field::SizeId)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Size id does not belong to this store");

        ensure_deletable(&catalog, store.id, EntityRef::Size(size.id))
            .await
            .unwrap();
        let err = ensure_deletable(&catalog, store.id, EntityRef::Size(SizeId::generate()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
