//! Courtside admin library.
//!
//! The store-owner dashboard API as a library, so the binary, the CLI and the
//! integration tests share one router and one persistence gateway.
//!
//! # Layers
//!
//! - [`routes`] - axum handlers, one module per resource
//! - [`services`] - validation, ownership guard and entity handlers
//! - [`db`] - the [`Catalog`](db::Catalog) gateway (`PostgreSQL` and in-memory)
//! - [`models`] - domain types serialized to the dashboard frontend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the application router with request tracing, request IDs and
/// principal extraction applied.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::AUTHORIZATION};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use courtside_core::UserId;

    use super::*;
    use crate::db::MemoryCatalog;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::services::IdentityVerifier;

    fn test_app() -> (Router, IdentityVerifier) {
        let identity = IdentityVerifier::new(SecretString::from("test-signing-secret".to_string()));
        let state = AppState::new(Arc::new(MemoryCatalog::new()), identity.clone());
        (app(state), identity)
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let (router, _) = test_app();
        let response = router
            .oneshot(
                Request::get("/health")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "req-123");
    }

    #[tokio::test]
    async fn test_request_id_generated() {
        let (router, _) = test_app();
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_bearer_token_becomes_principal() {
        let (router, identity) = test_app();
        let anonymous = router
            .clone()
            .oneshot(Request::get("/api/stores").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let token = identity
            .issue(&UserId::parse("u1").unwrap(), Duration::from_secs(60))
            .unwrap();
        let authenticated = router
            .oneshot(
                Request::get("/api/stores")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(authenticated.status(), StatusCode::OK);
    }
}
