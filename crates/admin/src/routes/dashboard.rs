//! Overview handler.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::instrument;

use crate::middleware::CurrentPrincipal;
use crate::services::dashboard::{self, Overview};
use crate::services::guard::require_principal;
use crate::{error::AppError, state::AppState};

use super::path_id;

/// Build the overview router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/{store_id}/overview", get(overview))
}

#[instrument(skip(state))]
async fn overview(
    State(state): State<AppState>,
    principal: CurrentPrincipal,
    Path(store_id): Path<String>,
) -> Result<Json<Overview>, AppError> {
    require_principal(principal.as_ref())?;
    let store_id = path_id(&store_id, "storeId")?;
    dashboard::overview(state.catalog(), principal.as_ref(), store_id)
        .await
        .inspect_err(|e| e.report("OVERVIEW_GET"))
        .map(Json)
}
