//! Database operations for teams.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use courtside_core::{BillboardId, ColorId, Conference, StoreId, TeamId};

use super::map_delete_error;
use crate::db::RepositoryError;
use crate::models::{Team, TeamInput};

/// Internal row type for team queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct TeamRow {
    id: TeamId,
    store_id: StoreId,
    name: String,
    image_url: String,
    billboard_id: BillboardId,
    primary_color_id: ColorId,
    secondary_color_id: ColorId,
    conference: Conference,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            name: row.name,
            image_url: row.image_url,
            billboard_id: row.billboard_id,
            primary_color_id: row.primary_color_id,
            secondary_color_id: row.secondary_color_id,
            conference: row.conference,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) const TEAM_COLUMNS: &str = "id, store_id, name, image_url, billboard_id, \
     primary_color_id, secondary_color_id, conference, created_at, updated_at";

/// Repository for team database operations.
pub struct TeamRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TeamRepository<'a> {
    /// Create a new team repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List teams of a store, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Team>, RepositoryError> {
        let rows = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {TEAM_COLUMNS} FROM catalog.team \
             WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a team by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: TeamId) -> Result<Option<Team>, RepositoryError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {TEAM_COLUMNS} FROM catalog.team WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a team.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, store: StoreId, input: &TeamInput) -> Result<Team, RepositoryError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            r"
            INSERT INTO catalog.team (
                id, store_id, name, image_url, billboard_id,
                primary_color_id, secondary_color_id, conference
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TEAM_COLUMNS}
            "
        ))
        .bind(TeamId::generate())
        .bind(store)
        .bind(&input.name)
        .bind(&input.image_url)
        .bind(input.billboard_id)
        .bind(input.primary_color_id)
        .bind(input.secondary_color_id)
        .bind(&input.conference)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a team's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        store: StoreId,
        id: TeamId,
        input: &TeamInput,
    ) -> Result<Option<Team>, RepositoryError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            r"
            UPDATE catalog.team
            SET name = $3, image_url = $4, billboard_id = $5,
                primary_color_id = $6, secondary_color_id = $7,
                conference = $8, updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING {TEAM_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store)
        .bind(&input.name)
        .bind(&input.image_url)
        .bind(input.billboard_id)
        .bind(input.primary_color_id)
        .bind(input.secondary_color_id)
        .bind(&input.conference)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a team.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if products still belong to it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, store: StoreId, id: TeamId) -> Result<Option<Team>, RepositoryError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "DELETE FROM catalog.team WHERE id = $1 AND store_id = $2 RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_delete_error(e, "Team"))?;

        Ok(row.map(Into::into))
    }
}
