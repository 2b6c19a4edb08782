//! Category handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use tracing::instrument;

use crate::middleware::CurrentPrincipal;
use crate::models::{Category, CategoryWithBillboard};
use crate::services::guard::require_principal;
use crate::services::categories::{self, CategoryPayload};
use crate::{error::AppError, state::AppState};

use super::{json_body, path_id};

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/categories", get(index).post(create))
        .route(
            "/api/{store_id}/categories/{category_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Category>>, AppError> {
    let store_id = path_id(&store_id, "storeId")?;
    categories::list(state.catalog(), store_id)
        .await
        .inspect_err(|e| e.report("CATEGORIES_GET"))
        .map(Json)
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(String, String)>,
) -> Result<Json<Option<CategoryWithBillboard>>, AppError> {
    path_id::<courtside_core::StoreId>(&store_id, "storeId")?;
    let category_id = path_id(&category_id, "categoryId")?;
    categories::get(state.catalog(), category_id)
        .await
        .inspect_err(|e| e.report("CATEGORY_GET"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn create(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
    body: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    categories::create(state.catalog(), principal.as_ref(), store_id, payload)
        .await
        .inspect_err(|e| e.report("CATEGORIES_POST"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn update(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, category_id)): Path<(String, String)>,
    body: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<Category>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    let category_id = path_id(&category_id, "categoryId")?;
    categories::update(
        state.catalog(),
        principal.as_ref(),
        store_id,
        category_id,
        payload,
    )
    .await
    .inspect_err(|e| e.report("CATEGORY_PATCH"))
    .map(Json)
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, category_id)): Path<(String, String)>,
) -> Result<Json<Category>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    let category_id = path_id(&category_id, "categoryId")?;
    categories::delete(state.catalog(), principal.as_ref(), store_id, category_id)
        .await
        .inspect_err(|e| e.report("CATEGORY_DELETE"))
        .map(Json)
}
