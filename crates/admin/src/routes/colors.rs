//! Color handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use tracing::instrument;

use crate::middleware::CurrentPrincipal;
use crate::models::Color;
use crate::services::guard::require_principal;
use crate::services::colors::{self, ColorPayload};
use crate::{error::AppError, state::AppState};

use super::{json_body, path_id};

/// Build the colors router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/colors", get(index).post(create))
        .route(
            "/api/{store_id}/colors/{color_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Color>>, AppError> {
    let store_id = path_id(&store_id, "storeId")?;
    colors::list(state.catalog(), store_id)
        .await
        .inspect_err(|e| e.report("COLORS_GET"))
        .map(Json)
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path((store_id, color_id)): Path<(String, String)>,
) -> Result<Json<Option<Color>>, AppError> {
    path_id::<courtside_core::StoreId>(&store_id, "storeId")?;
    let color_id = path_id(&color_id, "colorId")?;
    colors::get(state.catalog(), color_id)
        .await
        .inspect_err(|e| e.report("COLOR_GET"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn create(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
    body: Result<Json<ColorPayload>, JsonRejection>,
) -> Result<Json<Color>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    colors::create(state.catalog(), principal.as_ref(), store_id, payload)
        .await
        .inspect_err(|e| e.report("COLORS_POST"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn update(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, color_id)): Path<(String, String)>,
    body: Result<Json<ColorPayload>, JsonRejection>,
) -> Result<Json<Color>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    let color_id = path_id(&color_id, "colorId")?;
    colors::update(
        state.catalog(),
        principal.as_ref(),
        store_id,
        color_id,
        payload,
    )
    .await
    .inspect_err(|e| e.report("COLOR_PATCH"))
    .map(Json)
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, color_id)): Path<(String, String)>,
) -> Result<Json<Color>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    let color_id = path_id(&color_id, "colorId")?;
    colors::delete(state.catalog(), principal.as_ref(), store_id, color_id)
        .await
        .inspect_err(|e| e.report("COLOR_DELETE"))
        .map(Json)
}
