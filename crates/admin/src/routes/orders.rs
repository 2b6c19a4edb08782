//! Order table handler.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::instrument;

use crate::middleware::CurrentPrincipal;
use crate::services::guard::require_principal;
use crate::services::orders::{self, OrderView};
use crate::{error::AppError, state::AppState};

use super::path_id;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/{store_id}/orders", get(index))
}

#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<OrderView>>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    orders::list(state.catalog(), principal.as_ref(), store_id)
        .await
        .inspect_err(|e| e.report("ORDERS_GET"))
        .map(Json)
}
