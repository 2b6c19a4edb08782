//! Store resource handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use tracing::instrument;

use crate::middleware::CurrentPrincipal;
use crate::models::Store;
use crate::services::guard::require_principal;
use crate::services::stores::{self, StorePayload};
use crate::{error::AppError, state::AppState};

use super::{json_body, path_id};

/// Build the stores router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stores", get(index).post(create))
        .route(
            "/api/stores/{store_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
) -> Result<Json<Vec<Store>>, AppError> {
    stores::list(state.catalog(), principal.as_ref())
        .await
        .inspect_err(|e| e.report("STORES_GET"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn create(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    body: Result<Json<StorePayload>, JsonRejection>,
) -> Result<Json<Store>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    stores::create(state.catalog(), principal.as_ref(), payload)
        .await
        .inspect_err(|e| e.report("STORES_POST"))
        .map(Json)
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
) -> Result<Json<Option<Store>>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    stores::get(state.catalog(), principal.as_ref(), store_id)
        .await
        .inspect_err(|e| e.report("STORE_GET"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn update(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
    body: Result<Json<StorePayload>, JsonRejection>,
) -> Result<Json<Store>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    stores::rename(state.catalog(), principal.as_ref(), store_id, payload)
        .await
        .inspect_err(|e| e.report("STORE_PATCH"))
        .map(Json)
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
) -> Result<Json<Store>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    stores::delete(state.catalog(), principal.as_ref(), store_id)
        .await
        .inspect_err(|e| e.report("STORE_DELETE"))
        .map(Json)
}
