//! Integration tests for the admin web API.
//!
//! These tests require the `web` feature to be enabled:
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use villa_showcase::services::{
    AdminCredentials, AdminServices, AuthGate, FileValidator, MemoryTokenStore,
};
use villa_showcase::store::{ContentStore, FsMediaStore, MediaStore, MemoryStore};
use villa_showcase::web::{create_router, AppState};

const USERNAME: &str = "admin";
const PASSWORD: &str = "terrazza";

/// Creates a router over an in-memory record store and a temporary media
/// directory, with admin credentials configured.
fn create_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let media_root = temp_dir.path().join("media");

    let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::new());
    let media: Arc<dyn MediaStore> =
        Arc::new(FsMediaStore::open(&media_root).expect("Failed to open media store"));
    let auth = AuthGate::new(
        Some(AdminCredentials::new(USERNAME, PASSWORD)),
        Arc::new(MemoryTokenStore::new()),
    );
    let services =
        AdminServices::with_stores(store, media, auth, FileValidator::default(), media_root);

    (create_router(AppState::new(services)), temp_dir)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn json_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    send(
        app,
        builder
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
    )
    .await
}

async fn upload(
    app: &axum::Router,
    uri: &str,
    token: &str,
    content_type: &str,
    bytes: &'static [u8],
) -> (StatusCode, Value) {
    send_file(app, "POST", uri, token, content_type, bytes).await
}

async fn send_file(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: &str,
    content_type: &str,
    bytes: &'static [u8],
) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", content_type)
            .body(Body::from(bytes))
            .unwrap(),
    )
    .await
}

async fn delete(app: &axum::Router, uri: &str, token: &str) -> StatusCode {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

async fn login(app: &axum::Router) -> String {
    let (status, json) = json_request(
        app,
        "POST",
        "/api/admin/login",
        None,
        json!({ "username": USERNAME, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().expect("token").to_string()
}

// ============================================================================
// Health + Session Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (app, _temp_dir) = create_test_app();

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, _temp_dir) = create_test_app();

    let (status, json) = json_request(
        &app,
        "POST",
        "/api/admin/login",
        None,
        json!({ "username": USERNAME, "password": "wrong" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_mutations_require_token() {
    let (app, _temp_dir) = create_test_app();

    let (status, _) = json_request(
        &app,
        "POST",
        "/api/categories",
        None,
        json!({ "name": "Summer Deals" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = json_request(
        &app,
        "POST",
        "/api/categories",
        Some("not-a-token"),
        json!({ "name": "Summer Deals" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (status, _) =
        json_request(&app, "POST", "/api/admin/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = json_request(
        &app,
        "POST",
        "/api/categories",
        Some(&token),
        json!({ "name": "Summer Deals" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_new_login_replaces_previous_session() {
    let (app, _temp_dir) = create_test_app();
    let first = login(&app).await;
    let second = login(&app).await;

    let (status, _) = json_request(
        &app,
        "POST",
        "/api/categories",
        Some(&first),
        json!({ "name": "Summer Deals" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = json_request(
        &app,
        "POST",
        "/api/categories",
        Some(&second),
        json!({ "name": "Summer Deals" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// ============================================================================
// Category Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_category_lifecycle() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (status, created) = json_request(
        &app,
        "POST",
        "/api/categories",
        Some(&token),
        json!({ "name": "Italian Summer" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "italian-summer");
    assert_eq!(created["order"], 1);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = json_request(
        &app,
        "PUT",
        &format!("/api/categories/{id}"),
        Some(&token),
        json!({ "name": "Tuscan Summer", "order": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], "tuscan-summer");
    assert_eq!(updated["order"], 3);

    let (_, list) = get_json(&app, "/api/categories").await;
    assert_eq!(list["count"], 1);
    assert_eq!(list["categories"][0]["name"], "Tuscan Summer");

    let status = delete(&app, &format!("/api/categories/{id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = get_json(&app, "/api/categories").await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_category_duplicate_slug_is_bad_request() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    json_request(
        &app,
        "POST",
        "/api/categories",
        Some(&token),
        json!({ "name": "Winter Deals" }),
    )
    .await;
    let (status, json) = json_request(
        &app,
        "POST",
        "/api/categories",
        Some(&token),
        json!({ "name": "winter deals" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["details"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_update_unknown_category_is_not_found() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (status, _) = json_request(
        &app,
        "PUT",
        "/api/categories/missing",
        Some(&token),
        json!({ "order": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Hero Image Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_hero_image_upload_and_serve() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (status, image) = upload(
        &app,
        "/api/hero-images?title=Sunset%20terrace&file_name=terrace.png",
        &token,
        "image/png",
        b"fake png bytes",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(image["title"], "Sunset terrace");
    assert_eq!(image["order"], 1);
    assert_eq!(image["fileType"], "image/png");
    assert_eq!(image["fileSize"], 14);

    let url = image["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/media/hero-images/"));

    let response = app
        .clone()
        .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"fake png bytes");

    let (_, list) = get_json(&app, "/api/hero-images").await;
    assert_eq!(list["count"], 1);
}

#[tokio::test]
async fn test_hero_image_rejects_non_image() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (status, json) = upload(
        &app,
        "/api/hero-images?title=Notes&file_name=notes.txt",
        &token,
        "text/plain",
        b"hello",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"], "Please select a valid image file");

    let (_, list) = get_json(&app, "/api/hero-images").await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_hero_image_title_update_and_delete() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (_, image) = upload(
        &app,
        "/api/hero-images?title=Pool&file_name=pool.jpg",
        &token,
        "image/jpeg",
        b"jpeg",
    )
    .await;
    let id = image["id"].as_str().unwrap().to_string();

    let (status, updated) = json_request(
        &app,
        "PUT",
        &format!("/api/hero-images/{id}"),
        Some(&token),
        json!({ "title": "Infinity pool" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Infinity pool");
    assert_eq!(updated["url"], image["url"]);

    let (status, _) = json_request(
        &app,
        "PUT",
        &format!("/api/hero-images/{id}"),
        Some(&token),
        json!({ "title": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(
        delete(&app, &format!("/api/hero-images/{id}"), &token).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        delete(&app, &format!("/api/hero-images/{id}"), &token).await,
        StatusCode::NOT_FOUND
    );
}

// ============================================================================
// Item Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_item_upload_filter_and_edit() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (status, pool) = upload(
        &app,
        "/api/items?title=Pool&location=Amalfi&category=italian-summer&file_name=pool.png",
        &token,
        "image/png",
        b"png",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pool["altText"], "Pool");
    assert_eq!(pool["order"], 1);

    let (status, chalet) = upload(
        &app,
        "/api/items?title=Chalet&location=Dolomites&category=winter-deals&file_name=chalet.png",
        &token,
        "image/png",
        b"png",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(chalet["order"], 2);

    let (_, all) = get_json(&app, "/api/items?category=all").await;
    assert_eq!(all["count"], 2);

    let (_, winter) = get_json(&app, "/api/items?category=winter-deals").await;
    assert_eq!(winter["count"], 1);
    assert_eq!(winter["items"][0]["title"], "Chalet");

    let id = pool["id"].as_str().unwrap();
    let (status, updated) = json_request(
        &app,
        "PUT",
        &format!("/api/items/{id}"),
        Some(&token),
        json!({ "title": "Infinity pool", "category": "summer-deals" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Infinity pool");
    assert_eq!(updated["altText"], "Infinity pool");
    assert_eq!(updated["category"], "summer-deals");
    assert_eq!(updated["location"], "Amalfi");
}

#[tokio::test]
async fn test_item_upload_requires_fields() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (status, json) = upload(
        &app,
        "/api/items?title=Pool&location=&category=italian-summer&file_name=pool.png",
        &token,
        "image/png",
        b"png",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"], "Location is required");
}

#[tokio::test]
async fn test_item_delete_removes_media() {
    let (app, temp_dir) = create_test_app();
    let token = login(&app).await;

    let (_, item) = upload(
        &app,
        "/api/items?title=Pool&location=Amalfi&category=italian-summer&file_name=pool.png",
        &token,
        "image/png",
        b"png",
    )
    .await;
    let id = item["id"].as_str().unwrap();
    let file_name = item["fileName"].as_str().unwrap();
    let stored = temp_dir
        .path()
        .join("media")
        .join("collection-items")
        .join(file_name);
    assert!(stored.exists());

    assert_eq!(
        delete(&app, &format!("/api/items/{id}"), &token).await,
        StatusCode::NO_CONTENT
    );
    assert!(!stored.exists());

    let (_, all) = get_json(&app, "/api/items").await;
    assert_eq!(all["count"], 0);
}

#[tokio::test]
async fn test_item_image_replacement_swaps_media() {
    let (app, temp_dir) = create_test_app();
    let token = login(&app).await;
    let items_dir = temp_dir.path().join("media").join("collection-items");

    let (_, item) = upload(
        &app,
        "/api/items?title=Pool&location=Amalfi&category=italian-summer&file_name=pool.png",
        &token,
        "image/png",
        b"old png",
    )
    .await;
    let id = item["id"].as_str().unwrap();
    let old_file = items_dir.join(item["fileName"].as_str().unwrap());
    assert!(old_file.exists());

    let (status, replaced) = send_file(
        &app,
        "PUT",
        &format!("/api/items/{id}/image?file_name=pool-at-dusk.webp"),
        &token,
        "image/webp; charset=binary",
        b"new webp bytes",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], id);
    assert_eq!(replaced["title"], "Pool");
    assert_eq!(replaced["fileType"], "image/webp");
    assert_eq!(replaced["fileSize"], 14);

    let image_src = replaced["imageSrc"].as_str().unwrap().to_string();
    assert_ne!(image_src, item["imageSrc"].as_str().unwrap());
    assert!(image_src.ends_with(".webp"));

    let response = app
        .clone()
        .oneshot(Request::builder().uri(&image_src).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"new webp bytes");

    assert!(!old_file.exists());
    assert!(items_dir
        .join(replaced["fileName"].as_str().unwrap())
        .exists());
}

#[tokio::test]
async fn test_item_image_replacement_validates_upload() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (_, item) = upload(
        &app,
        "/api/items?title=Pool&location=Amalfi&category=italian-summer&file_name=pool.png",
        &token,
        "image/png",
        b"png",
    )
    .await;
    let id = item["id"].as_str().unwrap();

    let (status, _) = send_file(
        &app,
        "PUT",
        &format!("/api/items/{id}/image?file_name=notes.txt"),
        &token,
        "text/plain",
        b"not an image",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_file(
        &app,
        "PUT",
        "/api/items/missing/image?file_name=pool.png",
        &token,
        "image/png",
        b"png",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = get_json(&app, "/api/items").await;
    assert_eq!(all["items"][0]["imageSrc"], item["imageSrc"]);
}

#[tokio::test]
async fn test_category_rename_onto_taken_slug_is_bad_request() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let mut ids = Vec::new();
    for name in ["Greek Islands", "Italy"] {
        let (status, created) = json_request(
            &app,
            "POST",
            "/api/categories",
            Some(&token),
            json!({ "name": name }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    let italy = &ids[1];

    let (status, json) = json_request(
        &app,
        "PUT",
        &format!("/api/categories/{italy}"),
        Some(&token),
        json!({ "name": "Greek Islands" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["details"].as_str().unwrap().contains("already exists"));

    let (_, list) = get_json(&app, "/api/categories").await;
    assert_eq!(list["categories"][1]["slug"], "italy");
}

#[tokio::test]
async fn test_update_unknown_item_is_not_found() {
    let (app, _temp_dir) = create_test_app();
    let token = login(&app).await;

    let (status, _) = json_request(
        &app,
        "PUT",
        "/api/items/missing",
        Some(&token),
        json!({ "title": "Nope" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
