//! Billboards, categories, sizes, colors, teams and stores over HTTP.

use axum::http::StatusCode;
use serde_json::{Value, json};

use courtside_integration_tests::{TestApp, id_of};

#[tokio::test]
async fn field_orders_per_entity() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    let cases = [
        ("billboards", json!({ "imageUrl": "https://img.example/a.png" }), "Label is required"),
        ("billboards", json!({ "label": "Finals" }), "Image url is required"),
        ("categories", json!({ "name": "Jerseys" }), "Billboard id is required"),
        ("sizes", json!({ "value": "L" }), "Name is required"),
        ("colors", json!({ "name": "Green" }), "Value is required"),
        (
            "teams",
            json!({ "name": "Boston", "imageUrl": "https://img.example/b.png" }),
            "Billboard id is required",
        ),
    ];
    for (entity, body, message) in cases {
        let response = app
            .post(&format!("/api/{store}/{entity}"), Some(&owner), body)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{entity}");
        assert_eq!(response.body, message, "{entity}");
    }
}

#[tokio::test]
async fn team_conference_must_be_four_characters() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;

    let response = app
        .post(
            &format!("/api/{store}/teams"),
            Some(&owner),
            json!({
                "name": "Denver",
                "imageUrl": "https://img.example/den.png",
                "billboardId": refs.billboard,
                "primaryColorId": refs.color,
                "secondaryColorId": refs.color,
                "conference": "Western",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Conference must be exactly 4 characters");
}

#[tokio::test]
async fn category_get_includes_billboard() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;

    let category = app
        .get(&format!("/api/{store}/categories/{}", refs.category))
        .await
        .json();
    assert_eq!(category["name"], "Jerseys");
    assert_eq!(category["billboard"]["label"], "Finals");
}

#[tokio::test]
async fn unknown_id_reads_as_null() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    let response = app
        .get(&format!("/api/{store}/sizes/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), Value::Null);
}

#[tokio::test]
async fn patch_replaces_all_fields() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let created = app
        .post(
            &format!("/api/{store}/sizes"),
            Some(&owner),
            json!({ "name": "Large", "value": "L" }),
        )
        .await
        .json();
    let uri = format!("/api/{store}/sizes/{}", id_of(&created));

    let partial = app.patch(&uri, Some(&owner), json!({ "name": "XL" })).await;
    assert_eq!(partial.status, StatusCode::BAD_REQUEST);
    assert_eq!(partial.body, "Value is required");

    let full = app
        .patch(&uri, Some(&owner), json!({ "name": "XL", "value": "XL" }))
        .await;
    assert_eq!(full.status, StatusCode::OK);
    assert_eq!(app.get(&uri).await.json()["value"], "XL");
}

#[tokio::test]
async fn referenced_entities_cannot_be_deleted() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;

    let response = app
        .delete(
            &format!("/api/{store}/billboards/{}", refs.billboard),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .delete(&format!("/api/{store}/colors/{}", refs.color), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    // Unreferenced size goes away.
    let response = app
        .delete(&format!("/api/{store}/sizes/{}", refs.size), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn delete_from_another_store_is_404() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let mine = app.create_store(&owner, "Mine").await;
    let other = app.create_store(&owner, "Other").await;
    let refs = app.seed_references(&owner, &other).await;

    let response = app
        .delete(&format!("/api/{mine}/sizes/{}", refs.size), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_with_children_cannot_be_deleted() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "Busy").await;
    app.post(
        &format!("/api/{store}/sizes"),
        Some(&owner),
        json!({ "name": "Large", "value": "L" }),
    )
    .await;

    let response = app
        .delete(&format!("/api/stores/{store}"), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let empty = app.create_store(&owner, "Empty").await;
    let response = app
        .delete(&format!("/api/stores/{empty}"), Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let stores = app.get_as("/api/stores", &owner).await.json();
    assert_eq!(stores.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn alphabetical_and_newest_first_orders() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    for name in ["Red", "Blue", "Green"] {
        app.post(
            &format!("/api/{store}/colors"),
            Some(&owner),
            json!({ "name": name, "value": "#000000" }),
        )
        .await;
    }
    for label in ["First", "Second"] {
        app.post(
            &format!("/api/{store}/billboards"),
            Some(&owner),
            json!({ "label": label, "imageUrl": "https://img.example/x.png" }),
        )
        .await;
    }

    let colors = app.get(&format!("/api/{store}/colors")).await.json();
    let color_names: Vec<&str> = colors
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(color_names, vec!["Blue", "Green", "Red"]);

    let billboards = app.get(&format!("/api/{store}/billboards")).await.json();
    let labels: Vec<&str> = billboards
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|b| b["label"].as_str())
        .collect();
    assert_eq!(labels, vec!["Second", "First"]);
}
