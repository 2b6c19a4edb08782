//! Authentication and store ownership over HTTP.

use axum::http::StatusCode;
use serde_json::{Value, json};

use courtside_integration_tests::TestApp;

#[tokio::test]
async fn mutation_without_token_is_401() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    let response = app
        .post(
            &format!("/api/{store}/sizes"),
            None,
            json!({ "name": "Large", "value": "L" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, "Unauthenticated");
}

#[tokio::test]
async fn mutation_by_non_owner_is_403_and_writes_nothing() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let intruder = app.token("user_2");
    let store = app.create_store(&owner, "S1").await;

    let response = app
        .post(
            &format!("/api/{store}/colors"),
            Some(&intruder),
            json!({ "name": "Green", "value": "#007A33" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, "Unauthorized");

    let colors = app.get(&format!("/api/{store}/colors")).await.json();
    assert_eq!(colors, json!([]));
}

#[tokio::test]
async fn non_owner_cannot_rename_store() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    let response = app
        .patch(
            &format!("/api/stores/{store}"),
            Some(&app.token("user_2")),
            json!({ "name": "Mine now" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let fetched = app.get_as(&format!("/api/stores/{store}"), &owner).await;
    assert_eq!(fetched.json()["name"], "S1");
}

#[tokio::test]
async fn forged_token_is_treated_as_anonymous() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    let mut forged = owner.clone();
    forged.pop();
    forged.push(if owner.ends_with('0') { '1' } else { '0' });

    let response = app
        .patch(
            &format!("/api/stores/{store}"),
            Some(&forged),
            json!({ "name": "Renamed" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_malformed_body_is_still_401() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    let response = app
        .post(&format!("/api/{store}/billboards"), None, json!("not an object"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .post(
            &format!("/api/{store}/billboards"),
            Some(&owner),
            json!("not an object"),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_get_is_null_for_other_users() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    let theirs = app
        .get_as(&format!("/api/stores/{store}"), &app.token("user_2"))
        .await;
    assert_eq!(theirs.status, StatusCode::OK);
    assert_eq!(theirs.json(), Value::Null);

    let listed = app.get_as("/api/stores", &app.token("user_2")).await;
    assert_eq!(listed.json(), json!([]));
}

#[tokio::test]
async fn reads_need_no_token() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    for entity in ["billboards", "categories", "sizes", "colors", "teams", "products"] {
        let response = app.get(&format!("/api/{store}/{entity}")).await;
        assert_eq!(response.status, StatusCode::OK, "{entity}");
    }
}

#[tokio::test]
async fn orders_and_overview_need_ownership() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    for path in ["orders", "overview"] {
        let uri = format!("/api/{store}/{path}");
        assert_eq!(app.get(&uri).await.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            app.get_as(&uri, &app.token("user_2")).await.status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(app.get_as(&uri, &owner).await.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn malformed_path_id_is_400() {
    let app = TestApp::new();
    let response = app.get("/api/not-a-uuid/products").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Invalid storeId");
}

#[tokio::test]
async fn health_endpoints() {
    let app = TestApp::new();
    let live = app.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");
    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}
