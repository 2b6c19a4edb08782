//! Product handlers over HTTP: validation order, filters, image sets.

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use courtside_admin::db::Catalog;
use courtside_core::ProductId;
use courtside_integration_tests::{TestApp, id_of};

fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|p| p["name"].as_str().expect("name").to_string())
        .collect()
}

fn image_urls(product: &Value) -> Vec<String> {
    let mut urls: Vec<String> = product["images"]
        .as_array()
        .expect("images")
        .iter()
        .map(|i| i["url"].as_str().expect("url").to_string())
        .collect();
    urls.sort();
    urls
}

#[tokio::test]
async fn missing_fields_reported_in_declared_order() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;
    let uri = format!("/api/{store}/products");

    let cases = [
        ("name", "Name is required"),
        ("price", "Price is required"),
        ("description", "Description is required"),
        ("images", "Images are required"),
        ("colorId", "Color id is required"),
        ("categoryId", "Category id is required"),
        ("sizeId", "Size id is required"),
        ("teamId", "Team id is required"),
    ];
    for (field, message) in cases {
        let mut body = refs.product("Home Jersey", "110.00", &["https://img.example/a.png"]);
        body.as_object_mut().expect("object").remove(field);
        let response = app.post(&uri, Some(&owner), body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{field}");
        assert_eq!(response.body, message);
    }

    assert_eq!(app.get(&uri).await.json(), json!([]));
}

#[tokio::test]
async fn zero_price_is_treated_as_missing() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;

    let response = app
        .post(
            &format!("/api/{store}/products"),
            Some(&owner),
            refs.product("Home Jersey", "0", &["https://img.example/a.png"]),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Price is required");

    let count = app.get(&format!("/api/{store}/products/count")).await.json();
    assert_eq!(count, json!(0));
}

#[tokio::test]
async fn price_is_kept_to_cents() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;
    let uri = format!("/api/{store}/products");

    let response = app
        .post(&uri, Some(&owner), refs.product("Tiny", "0.004", &["https://img.example/t.png"]))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Price is required");

    let response = app
        .post(
            &uri,
            Some(&owner),
            refs.product("Huge", "123456789012.345", &["https://img.example/h.png"]),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Price must be less than 10000000000");

    let created = app
        .post(&uri, Some(&owner), refs.product("Odd", "12.345", &["https://img.example/o.png"]))
        .await;
    assert_eq!(created.status, StatusCode::OK, "{}", created.body);
    let price: Decimal = created.json()["price"]
        .as_str()
        .expect("price string")
        .parse()
        .expect("decimal");
    assert_eq!(price, Decimal::new(1235, 2));
}

#[tokio::test]
async fn featured_filter_excludes_archived_newest_first() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;
    let uri = format!("/api/{store}/products");

    let products = [
        ("Old Featured", true, false),
        ("Plain", false, false),
        ("Archived Featured", true, true),
        ("New Featured", true, false),
    ];
    for (name, featured, archived) in products {
        let mut body = refs.product(name, "50.00", &["https://img.example/p.png"]);
        body["isFeatured"] = json!(featured);
        body["isArchived"] = json!(archived);
        let response = app.post(&uri, Some(&owner), body).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    }

    let featured = app.get(&format!("{uri}?isFeatured=1")).await.json();
    assert_eq!(names(&featured), vec!["New Featured", "Old Featured"]);

    let all = app.get(&uri).await.json();
    assert_eq!(names(&all), vec!["New Featured", "Plain", "Old Featured"]);

    let not_featured = app.get(&format!("{uri}?isFeatured=false")).await.json();
    assert_eq!(names(&not_featured), vec!["Plain"]);

    let count = app
        .get(&format!("{uri}/count?isFeatured=true&categoryId={}", refs.category))
        .await
        .json();
    assert_eq!(count, json!(2));
}

#[tokio::test]
async fn invalid_flag_is_400() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;

    let response = app.get(&format!("/api/{store}/products?isRetro=maybe")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Invalid isRetro");
}

#[tokio::test]
async fn update_replaces_whole_image_set() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;

    let created = app
        .post(
            &format!("/api/{store}/products"),
            Some(&owner),
            refs.product("Home", "110.00", &["https://img.example/a.png", "https://img.example/b.png"]),
        )
        .await
        .json();
    let product = id_of(&created);
    assert_eq!(
        image_urls(&created),
        vec!["https://img.example/a.png", "https://img.example/b.png"]
    );

    let uri = format!("/api/{store}/products/{product}");
    let updated = app
        .patch(
            &uri,
            Some(&owner),
            refs.product("Home", "120.00", &["https://img.example/c.png"]),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);

    let fetched = app.get(&uri).await.json();
    assert_eq!(image_urls(&fetched), vec!["https://img.example/c.png"]);
    assert_eq!(fetched["category"]["name"], "Jerseys");
    assert_eq!(fetched["team"]["conference"], "East");
}

#[tokio::test]
async fn delete_cascades_to_images() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;

    let created = app
        .post(
            &format!("/api/{store}/products"),
            Some(&owner),
            refs.product("Away", "95.50", &["https://img.example/a.png"]),
        )
        .await
        .json();
    let product = id_of(&created);
    let product_id: ProductId = product.parse().expect("product id");
    assert_eq!(app.catalog.list_images(product_id).await.expect("images").len(), 1);

    let uri = format!("/api/{store}/products/{product}");
    assert_eq!(app.delete(&uri, Some(&owner)).await.status, StatusCode::OK);

    assert!(app.catalog.list_images(product_id).await.expect("images").is_empty());
    assert_eq!(app.get(&uri).await.json(), Value::Null);
}

#[tokio::test]
async fn references_must_belong_to_the_store() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let home = app.create_store(&owner, "Home").await;
    let other = app.create_store(&owner, "Other").await;
    let home_refs = app.seed_references(&owner, &home).await;
    let other_refs = app.seed_references(&owner, &other).await;

    let mut body = home_refs.product("Mixed", "80.00", &["https://img.example/m.png"]);
    body["teamId"] = json!(other_refs.team);
    let response = app
        .post(&format!("/api/{home}/products"), Some(&owner), body)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Team id does not belong to this store");
}

#[tokio::test]
async fn patch_unknown_product_is_404() {
    let app = TestApp::new();
    let owner = app.token("user_1");
    let store = app.create_store(&owner, "S1").await;
    let refs = app.seed_references(&owner, &store).await;

    let response = app
        .patch(
            &format!("/api/{store}/products/{}", ProductId::generate()),
            Some(&owner),
            refs.product("Ghost", "10.00", &["https://img.example/g.png"]),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
