//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                  - Liveness
//! GET    /health/ready                            - Readiness (gateway ping)
//!
//! GET    /api/stores                              - Caller's stores
//! POST   /api/stores                              - Create store
//! GET    /api/stores/{storeId}                    - Store if owned, else null
//! PATCH  /api/stores/{storeId}                    - Rename store
//! DELETE /api/stores/{storeId}                    - Delete empty store
//!
//! GET    /api/{storeId}/{entity}                  - List
//! POST   /api/{storeId}/{entity}                  - Create
//! GET    /api/{storeId}/{entity}/{id}             - Get (null if unknown)
//! PATCH  /api/{storeId}/{entity}/{id}             - Replace fields
//! DELETE /api/{storeId}/{entity}/{id}             - Delete
//!   where {entity} is billboards, categories, sizes, colors, teams, products
//!
//! GET    /api/{storeId}/products/count            - Filtered product count
//! GET    /api/{storeId}/orders                    - Orders with totals
//! GET    /api/{storeId}/overview                  - Revenue, sales, stock, graph
//! ```
//!
//! Each handler reports server faults with an operation tag such as
//! `PRODUCT_PATCH` before the uniform 500 response goes out.

pub mod billboards;
pub mod categories;
pub mod colors;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod sizes;
pub mod stores;
pub mod teams;

use axum::{Json, Router, extract::rejection::JsonRejection};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Principal;
use crate::services::guard::require_principal;
use crate::state::AppState;

/// Build the complete router (without state or middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(stores::router())
        .merge(billboards::router())
        .merge(categories::router())
        .merge(sizes::router())
        .merge(colors::router())
        .merge(teams::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(dashboard::router())
}

/// Parse a path segment as a typed id.
///
/// # Errors
///
/// Returns `AppError::BadRequest` naming the parameter if it is not a UUID.
pub fn path_id<T: From<Uuid>>(raw: &str, name: &str) -> Result<T, AppError> {
    courtside_core::parse_id(raw).map_err(|_| AppError::BadRequest(format!("Invalid {name}")))
}

/// Unwrap a JSON body for a mutation.
///
/// Authentication is checked first so an anonymous caller gets 401 even when
/// the body is malformed.
///
/// # Errors
///
/// Returns `AppError::Unauthenticated` without a principal and
/// `AppError::BadRequest` for an unreadable body.
pub fn json_body<T>(
    principal: Option<&Principal>,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    require_principal(principal)?;
    body.map(|Json(payload)| payload)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courtside_core::{StoreId, UserId};

    use super::*;

    #[test]
    fn test_path_id() {
        let id = StoreId::generate();
        let parsed: StoreId = path_id(&id.to_string(), "storeId").unwrap();
        assert_eq!(parsed, id);

        let err = path_id::<StoreId>("nope", "storeId").unwrap_err();
        assert_eq!(err.to_string(), "Invalid storeId");
    }

    #[test]
    fn test_json_body_requires_principal() {
        let err = json_body(None, Ok(Json(()))).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));

        let principal = Principal::new(UserId::parse("u1").unwrap());
        json_body(Some(&principal), Ok(Json(()))).unwrap();
    }
}
