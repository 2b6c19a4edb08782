//! Team handlers.

use serde::Deserialize;

use courtside_core::{StoreId, TeamId};

use crate::db::{Catalog, EntityRef};
use crate::error::AppError;
use crate::models::{Principal, Team, TeamInput};

use super::guard::{
    authorize_store_mutation, ensure_deletable, ensure_in_store, not_found, require_principal,
};
use super::validation::{Field, ValidationError, required_conference, required_id, required_text};

/// Body of team create and update requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPayload {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub billboard_id: Option<String>,
    pub primary_color_id: Option<String>,
    pub secondary_color_id: Option<String>,
    pub conference: Option<String>,
}

impl TeamPayload {
    /// Validate in field order: name, image url, billboard id, primary color
    /// id, secondary color id, conference.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self) -> Result<TeamInput, ValidationError> {
        Ok(TeamInput {
            name: required_text(self.name, Field::Name)?,
            image_url: required_text(self.image_url, Field::ImageUrl)?,
            billboard_id: required_id(self.billboard_id, Field::BillboardId)?,
            primary_color_id: required_id(self.primary_color_id, Field::PrimaryColorId)?,
            secondary_color_id: required_id(self.secondary_color_id, Field::SecondaryColorId)?,
            conference: required_conference(self.conference)?,
        })
    }
}

async fn check_references(
    catalog: &dyn Catalog,
    store_id: StoreId,
    input: &TeamInput,
) -> Result<(), AppError> {
    let references = [
        (EntityRef::Billboard(input.billboard_id), Field::BillboardId),
        (EntityRef::Color(input.primary_color_id), Field::PrimaryColorId),
        (EntityRef::Color(input.secondary_color_id), Field::SecondaryColorId),
    ];
    for (entity, field) in references {
        ensure_in_store(catalog, store_id, entity, field).await?;
    }
    Ok(())
}

/// Teams of a store, newest first.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn list(catalog: &dyn Catalog, store_id: StoreId) -> Result<Vec<Team>, AppError> {
    Ok(catalog.list_teams(store_id).await?)
}

/// A team by id, from any store.
///
/// # Errors
///
/// Returns `AppError::Database` if the lookup fails.
pub async fn get(catalog: &dyn Catalog, id: TeamId) -> Result<Option<Team>, AppError> {
    Ok(catalog.get_team(id).await?)
}

/// Create a team.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Validation`,
/// `AppError::Forbidden`, or a validation error for a foreign reference.
pub async fn create(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    payload: TeamPayload,
) -> Result<Team, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    check_references(catalog, store_id, &input).await?;
    Ok(catalog.create_team(store_id, &input).await?)
}

/// Replace a team's fields.
///
/// # Errors
///
/// As [`create`], plus `AppError::NotFound` if the team is not in the store.
pub async fn update(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: TeamId,
    payload: TeamPayload,
) -> Result<Team, AppError> {
    let principal = require_principal(principal)?;
    let input = payload.validate()?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    check_references(catalog, store_id, &input).await?;
    catalog
        .update_team(store_id, id, &input)
        .await?
        .ok_or_else(|| not_found(EntityRef::Team(id)))
}

/// Delete a team with no products.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated`, `AppError::Forbidden`,
/// `AppError::NotFound`, or `AppError::Conflict` while it is in use.
pub async fn delete(
    catalog: &dyn Catalog,
    principal: Option<&Principal>,
    store_id: StoreId,
    id: TeamId,
) -> Result<Team, AppError> {
    let principal = require_principal(principal)?;
    authorize_store_mutation(catalog, principal, store_id).await?;
    ensure_deletable(catalog, store_id, EntityRef::Team(id)).await?;
    catalog
        .delete_team(store_id, id)
        .await?
        .ok_or_else(|| not_found(EntityRef::Team(id)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courtside_core::{BillboardId, ColorId};

    use super::*;

    fn full() -> TeamPayload {
        TeamPayload {
            name: Some("Boston".into()),
            image_url: Some("https://img.example/bos.png".into()),
            billboard_id: Some(BillboardId::generate().to_string()),
            primary_color_id: Some(ColorId::generate().to_string()),
            secondary_color_id: Some(ColorId::generate().to_string()),
            conference: Some("East".into()),
        }
    }

    #[test]
    fn test_field_order() {
        let cases: [(fn(&mut TeamPayload), &str); 6] = [
            (|p| p.name = None, "Name is required"),
            (|p| p.image_url = None, "Image url is required"),
            (|p| p.billboard_id = None, "Billboard id is required"),
            (|p| p.primary_color_id = None, "Primary color id is required"),
            (|p| p.secondary_color_id = None, "Secondary color id is required"),
            (|p| p.conference = None, "Conference is required"),
        ];
        for (strip, expected) in cases {
            let mut payload = full();
            strip(&mut payload);
            assert_eq!(payload.validate().unwrap_err().to_string(), expected);
        }
    }

    #[test]
    fn test_conference_length() {
        let mut payload = full();
        payload.conference = Some("Eastern".into());
        assert_eq!(
            payload.validate().unwrap_err().to_string(),
            "Conference must be exactly 4 characters"
        );
        assert!(full().validate().is_ok());
    }
}
