//! Size handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use tracing::instrument;

use crate::middleware::CurrentPrincipal;
use crate::models::Size;
use crate::services::guard::require_principal;
use crate::services::sizes::{self, SizePayload};
use crate::{error::AppError, state::AppState};

use super::{json_body, path_id};

/// Build the sizes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/sizes", get(index).post(create))
        .route(
            "/api/{store_id}/sizes/{size_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Size>>, AppError> {
    let store_id = path_id(&store_id, "storeId")?;
    sizes::list(state.catalog(), store_id)
        .await
        .inspect_err(|e| e.report("SIZES_GET"))
        .map(Json)
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path((store_id, size_id)): Path<(String, String)>,
) -> Result<Json<Option<Size>>, AppError> {
    path_id::<courtside_core::StoreId>(&store_id, "storeId")?;
    let size_id = path_id(&size_id, "sizeId")?;
    sizes::get(state.catalog(), size_id)
        .await
        .inspect_err(|e| e.report("SIZE_GET"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn create(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
    body: Result<Json<SizePayload>, JsonRejection>,
) -> Result<Json<Size>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    sizes::create(state.catalog(), principal.as_ref(), store_id, payload)
        .await
        .inspect_err(|e| e.report("SIZES_POST"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn update(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, size_id)): Path<(String, String)>,
    body: Result<Json<SizePayload>, JsonRejection>,
) -> Result<Json<Size>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    let size_id = path_id(&size_id, "sizeId")?;
    sizes::update(
        state.catalog(),
        principal.as_ref(),
        store_id,
        size_id,
        payload,
    )
    .await
    .inspect_err(|e| e.report("SIZE_PATCH"))
    .map(Json)
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, size_id)): Path<(String, String)>,
) -> Result<Json<Size>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    let size_id = path_id(&size_id, "sizeId")?;
    sizes::delete(state.catalog(), principal.as_ref(), store_id, size_id)
        .await
        .inspect_err(|e| e.report("SIZE_DELETE"))
        .map(Json)
}
