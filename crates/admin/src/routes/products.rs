//! Product handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::get,
};
use tracing::instrument;

use courtside_core::StoreId;

use crate::middleware::CurrentPrincipal;
use crate::models::{Product, ProductDetail};
use crate::services::guard::require_principal;
use crate::services::products::{self, ProductPayload, ProductQuery};
use crate::{error::AppError, state::AppState};

use super::{json_body, path_id};

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/products", get(index).post(create))
        .route("/api/{store_id}/products/count", get(count))
        .route(
            "/api/{store_id}/products/{product_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductDetail>>, AppError> {
    let store_id = path_id(&store_id, "storeId")?;
    let filter = query.into_filter()?;
    products::list(state.catalog(), store_id, &filter)
        .await
        .inspect_err(|e| e.report("PRODUCTS_GET"))
        .map(Json)
}

/// Filtered count, answered as a bare JSON number.
#[instrument(skip(state))]
async fn count(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<i64>, AppError> {
    let store_id = path_id(&store_id, "storeId")?;
    let filter = query.into_filter()?;
    products::count(state.catalog(), store_id, &filter)
        .await
        .inspect_err(|e| e.report("PRODUCTS_COUNT"))
        .map(Json)
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(String, String)>,
) -> Result<Json<Option<ProductDetail>>, AppError> {
    path_id::<StoreId>(&store_id, "storeId")?;
    let product_id = path_id(&product_id, "productId")?;
    products::get(state.catalog(), product_id)
        .await
        .inspect_err(|e| e.report("PRODUCT_GET"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn create(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    products::create(state.catalog(), principal.as_ref(), store_id, payload)
        .await
        .inspect_err(|e| e.report("PRODUCTS_POST"))
        .map(Json)
}

#[instrument(skip(state, body))]
async fn update(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, product_id)): Path<(String, String)>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let payload = json_body(principal.as_ref(), body)?;
    let store_id = path_id(&store_id, "storeId")?;
    let product_id = path_id(&product_id, "productId")?;
    products::update(
        state.catalog(),
        principal.as_ref(),
        store_id,
        product_id,
        payload,
    )
    .await
    .inspect_err(|e| e.report("PRODUCT_PATCH"))
    .map(Json)
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path((store_id, product_id)): Path<(String, String)>,
) -> Result<Json<Product>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    let product_id = path_id(&product_id, "productId")?;
    products::delete(state.catalog(), principal.as_ref(), store_id, product_id)
        .await
        .inspect_err(|e| e.report("PRODUCT_DELETE"))
        .map(Json)
}
