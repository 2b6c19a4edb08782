//! Billboard handlers.

use serde::Deserialize;

use courtside_core::{BillboardId, StoreId};

use crate::db::{Catalog, EntityRef};
use crate::error::AppError;
use crate::models::{Billboard, BillboardInput, Principal};

use super::guard::{authorize_store_mutation, ensure_deletable, not_found, require_principal};
use super::validation::{Field, ValidationError, required_text};

/// Body of billboard create and update requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardPayload {
    pub label: Option<String>,
    pub image_url: Option<String>,
}

impl BillboardPayload {
    /// Validate in field order: label, image url.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self) -> Result<BillboardInput, ValidationError> {
        Ok(BillboardInput {
            label: required_text(self.label, Field::Label)?,
            image_url: required_text(self.image_url, Field::ImageUrl)?,
        })
    }
}

/// Billboards of a store, newest first.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn list(catalog: &dyn Catalog, store_id: StoreId) -> Result<Vec<Billboard>, AppError> {
    Ok(catalog.list_billboards(store_id).await?)
}

/// A billboard by id, from any store.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn get(catalog: &dyn Catalog, id: BillboardId) -> Result<Option<Billboard>, AppError> {
    Ok(catalog.get_billboard(id).await?)
}

/// Create a billboard.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Validation` or
/// `AppError::Forbidden`, in that order of precedence.
pub async fn create(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    payload: BillboardPayload,
) -> Result<Billboard, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    Ok(catalog.create_billboard(store_id, &input).await?)
}

/// Replace a billboard's fields.
///
/// # Errors
///
/// As [`create`], plus `AppError::NotFound` if the billboard is not in the store.
pub async fn update(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: BillboardId,
    payload: BillboardPayload,
) -> Result<Billboard, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    catalog
        .update_billboard(store_id, id, &input)
        .await?
        .ok_or_else(|| not_found(EntityRef::Billboard(id)))
}

/// Delete a billboard no category or team shows.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Forbidden`,
/// `AppError::NotFound`, or `AppError::Conflict` while it is in use.
pub async fn delete(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: BillboardId,
) -> Result<Billboard, AppError> {
    let principal = require_principal(principal)?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    ensure_deletable(catalog, store_id, EntityRef::Billboard(id)).await?;
    catalog
        .delete_billboard(store_id, id)
        .await?
        .ok_or_else(|| not_found(EntityRef::Billboard(id)))
}
