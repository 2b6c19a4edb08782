//! Billboard handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use tracing::instrument;

use crate::middleware::CurrentPrincipal;
use crate::models::Billboard;
use crate::services::guard::require_principal;
use crate::services::billboards::{self, BillboardPayload};
use crate::{error::AppError, state::AppState};

use super::{json_body, path_id};

/// Build the billboards router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/billboards", get(index).post(create))
        .route(
            "/api/{store_id}/billboards/{billboard_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Billboard>>, AppError> {
    let store_id = path_id(&store_id, "storeId")?;
    billboards::list(state.catalog(), store_id)
        .await
        .inspect_err(|e| e.report("BILLBOARDS_GET"))
        .map(Json)
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path((store_id, billboard_id)): Path<(String, String)>,
) -> Result<Json<Option<Billboard>>, AppError> {
    path_id::<courtside_core::StoreId>(&store_id, "storeId")?;
    let billboard_id = path_id(&billboard_id, "billboardId")?;
    billboards::get(state.catalog(), billboard_id)
        .await
        .inspect_err(|e| e.report("BILLBOARD_GET"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn create(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
    body: Result<Json<BillboardPayload>, JsonRejection>,
) -> Result<Json<Billboard>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    billboards::create(state.catalog(), principal.as_ref(), store_id, payload)
        .await
        .inspect_err(|e| e.report("BILLBOARDS_POST"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn update(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, billboard_id)): Path<(String, String)>,
    body: Result<Json<BillboardPayload>, JsonRejection>,
) -> Result<Json<Billboard>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    let billboard_id = path_id(&billboard_id, "billboardId")?;
    billboards::update(
        state.catalog(),
        principal.as_ref(),
        store_id,
        billboard_id,
        payload,
    )
    .await
    .inspect_err(|e| e.report("BILLBOARD_PATCH"))
    .map(Json)
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, billboard_id)): Path<(String, String)>,
) -> Result<Json<Billboard>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    let billboard_id = path_id(&billboard_id, "billboardId")?;
    billboards::delete(state.catalog(), principal.as_ref(), store_id, billboard_id)
        .await
        .inspect_err(|e| e.report("BILLBOARD_DELETE"))
        .map(Json)
}
