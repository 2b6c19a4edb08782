//! Team handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use tracing::instrument;

use crate::middleware::CurrentPrincipal;
use crate::models::Team;
use crate::services::guard::require_principal;
use crate::services::teams::{self, TeamPayload};
use crate::{error::AppError, state::AppState};

use super::{json_body, path_id};

/// Build the teams router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/teams", get(index).post(create))
        .route(
            "/api/{store_id}/teams/{team_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Team>>, AppError> {
    let store_id = path_id(&store_id, "storeId")?;
    teams::list(state.catalog(), store_id)
        .await
        .inspect_err(|e| e.report("TEAMS_GET"))
        .map(Json)
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path((store_id, team_id)): Path<(String, String)>,
) -> Result<Json<Option<Team>>, AppError> {
    path_id::<courtside_core::StoreId>(&store_id, "storeId")?;
    let team_id = path_id(&team_id, "teamId")?;
    teams::get(state.catalog(), team_id)
        .await
        .inspect_err(|e| e.report("TEAM_GET"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn create(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
    body: Result<Json<TeamPayload>, JsonRejection>,
) -> Result<Json<Team>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    teams::create(state.catalog(), principal.as_ref(), store_id, payload)
        .await
        .inspect_err(|e| e.report("TEAMS_POST"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn update(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, team_id)): Path<(String, String)>,
    body: Result<Json<TeamPayload>, JsonRejection>,
) -> Result<Json<Team>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    let team_id = path_id(&team_id, "teamId")?;
    teams::update(
        state.catalog(),
        principal.as_ref(),
        store_id,
        team_id,
        payload,
    )
    .await
    .inspect_err(|e| e.report("TEAM_PATCH"))
    .map(Json)
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, team_id)): Path<(String, String)>,
) -> Result<Json<Team>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    let team_id = path_id(&team_id, "teamId")?;
    teams::delete(state.catalog(), principal.as_ref(), store_id, team_id)
        .await
        .inspect_err(|e| e.report("TEAM_DELETE"))
        .map(Json)
}
