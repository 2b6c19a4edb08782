//! Integration test harness for Courtside.
//!
//! Drives the real admin router in-process with `tower::ServiceExt::oneshot`
//! against the in-memory gateway, so no database or server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p courtside-integration-tests
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use courtside_admin::db::MemoryCatalog;
use courtside_admin::services::IdentityVerifier;
use courtside_admin::state::AppState;
use courtside_core::UserId;

const SIGNING_SECRET: &str = "kQ7#vN2$pL9!xR4@mT6&wB1*zH8^cF3%";

/// A response reduced to what assertions need.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }
}

/// The router plus direct access to its gateway.
pub struct TestApp {
    router: Router,
    pub catalog: Arc<MemoryCatalog>,
    identity: IdentityVerifier,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Build a fresh app with empty tables.
    #[must_use]
    pub fn new() -> Self {
        let catalog = Arc::new(MemoryCatalog::new());
        let identity = IdentityVerifier::new(SecretString::from(SIGNING_SECRET));
        let state = AppState::new(catalog.clone(), identity.clone());
        Self {
            router: courtside_admin::app(state),
            catalog,
            identity,
        }
    }

    /// A valid bearer token for `user`.
    ///
    /// # Panics
    ///
    /// Panics if `user` is not a valid user id.
    #[must_use]
    pub fn token(&self, user: &str) -> String {
        let user_id = UserId::parse(user).expect("valid user id");
        self.identity
            .issue(&user_id, Duration::from_secs(3600))
            .expect("token issued")
    }

    /// Send a request and collect the response.
    ///
    /// # Panics
    ///
    /// Panics if the router fails to answer.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request built");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router answered");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read");
        TestResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET` without credentials.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    /// `GET` as `token`.
    pub async fn get_as(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(token), None).await
    }

    /// `POST` a JSON body.
    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// `PATCH` a JSON body.
    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    /// `DELETE` a resource.
    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Create a store through the API and return its id.
    ///
    /// # Panics
    ///
    /// Panics if creation fails.
    pub async fn create_store(&self, token: &str, name: &str) -> String {
        let response = self
            .post("/api/stores", Some(token), json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        id_of(&response.json())
    }

    /// Create one of each product reference in `store` through the API.
    ///
    /// # Panics
    ///
    /// Panics if any creation fails.
    pub async fn seed_references(&self, token: &str, store: &str) -> References {
        let billboard = self
            .create(
                token,
                &format!("/api/{store}/billboards"),
                json!({ "label": "Finals", "imageUrl": "https://img.example/finals.png" }),
            )
            .await;
        let category = self
            .create(
                token,
                &format!("/api/{store}/categories"),
                json!({ "name": "Jerseys", "billboardId": billboard }),
            )
            .await;
        let size = self
            .create(
                token,
                &format!("/api/{store}/sizes"),
                json!({ "name": "Large", "value": "L" }),
            )
            .await;
        let color = self
            .create(
                token,
                &format!("/api/{store}/colors"),
                json!({ "name": "Green", "value": "#007A33" }),
            )
            .await;
        let team = self
            .create(
                token,
                &format!("/api/{store}/teams"),
                json!({
                    "name": "Boston",
                    "imageUrl": "https://img.example/bos.png",
                    "billboardId": billboard,
                    "primaryColorId": color,
                    "secondaryColorId": color,
                    "conference": "East",
                }),
            )
            .await;
        References {
            billboard,
            category,
            size,
            color,
            team,
        }
    }

    async fn create(&self, token: &str, uri: &str, body: Value) -> String {
        let response = self.post(uri, Some(token), body).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}: {}", response.body);
        id_of(&response.json())
    }
}

/// Ids of the entities a product needs.
#[derive(Debug, Clone)]
pub struct References {
    pub billboard: String,
    pub category: String,
    pub size: String,
    pub color: String,
    pub team: String,
}

impl References {
    /// A complete product payload using these references.
    #[must_use]
    pub fn product(&self, name: &str, price: &str, images: &[&str]) -> Value {
        json!({
            "name": name,
            "price": price,
            "description": format!("{name} description"),
            "images": images.iter().map(|url| json!({ "url": url })).collect::<Vec<_>>(),
            "colorId": self.color,
            "categoryId": self.category,
            "sizeId": self.size,
            "teamId": self.team,
        })
    }
}

/// The `id` field of a JSON entity.
///
/// # Panics
///
/// Panics if there is no string `id`.
#[must_use]
pub fn id_of(value: &Value) -> String {
    value
        .get("id")
        .and_then(Value::as_str)
        .expect("entity has an id")
        .to_string()
}
