//! Web API for the gallery admin panel.
//!
//! Exposes hero images, collection categories and collection items over a
//! small REST API, plus the uploaded media files themselves.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /api/admin/login` - Exchange credentials for a session token
//! - `POST /api/admin/logout` - End the active session
//! - `GET /api/hero-images` - List hero images
//! - `POST /api/hero-images?title=&file_name=` - Upload a hero image (raw body)
//! - `PUT /api/hero-images/{id}` - Change a hero image title
//! - `DELETE /api/hero-images/{id}` - Delete a hero image
//! - `GET /api/categories` - List active categories
//! - `POST /api/categories` - Create a category
//! - `PUT /api/categories/{id}` - Rename or reorder a category
//! - `DELETE /api/categories/{id}` - Deactivate a category
//! - `GET /api/items?category=` - List collection items
//! - `POST /api/items?title=&location=&category=&file_name=` - Upload an item (raw body)
//! - `PUT /api/items/{id}` - Edit an item
//! - `PUT /api/items/{id}/image?file_name=` - Replace an item's image (raw body)
//! - `DELETE /api/items/{id}` - Delete an item
//! - `GET /media/{*path}` - Uploaded files
//!
//! Mutating endpoints require `Authorization: Bearer <token>`.

use std::net::SocketAddr;
use std::path::Path as FsPath;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{CategoryUpdate, CollectionCategory, CollectionItem, HeroImage, ItemUpdate};
use crate::services::hero_images::next_order;
use crate::services::{AdminServices, AuthError, FileRejection, InvalidInput, UploadedFile};
use crate::store::StoreError;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    services: AdminServices,
}

impl AppState {
    /// Wraps already-opened services.
    pub const fn new(services: AdminServices) -> Self {
        Self { services }
    }

    /// Opens the services for `data_dir` using `config`.
    pub fn open(config: &Config, data_dir: &FsPath) -> anyhow::Result<Self> {
        Ok(Self::new(AdminServices::open(config, data_dir)?))
    }

    /// The wired admin services.
    #[must_use]
    pub const fn services(&self) -> &AdminServices {
        &self.services
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Hero image list response.
#[derive(Debug, Serialize)]
pub struct HeroImageListResponse {
    /// Images sorted by display order.
    pub images: Vec<HeroImage>,
    /// Number of images.
    pub count: usize,
}

/// Query parameters for a hero image upload.
#[derive(Debug, Deserialize)]
pub struct HeroUploadQuery {
    /// Display title.
    pub title: String,
    /// Original file name (used for the extension and MIME guess).
    pub file_name: String,
}

/// Hero image title change.
#[derive(Debug, Deserialize)]
pub struct HeroTitleRequest {
    /// New title.
    pub title: String,
}

/// Category list response.
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    /// Active categories sorted by display order.
    pub categories: Vec<CollectionCategory>,
    /// Number of categories.
    pub count: usize,
}

/// New category request body.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Display name.
    pub name: String,
    /// Display order (appended after existing categories when omitted).
    pub order: Option<u32>,
}

/// Query parameters for listing items.
#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    /// Category slug, or `all`.
    pub category: Option<String>,
}

/// Item list response.
#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    /// Items sorted by display order.
    pub items: Vec<CollectionItem>,
    /// Number of items.
    pub count: usize,
}

/// Query parameters for an item upload.
#[derive(Debug, Deserialize)]
pub struct ItemUploadQuery {
    /// Caption heading.
    pub title: String,
    /// Villa location.
    pub location: String,
    /// Category slug.
    pub category: String,
    /// Original file name.
    pub file_name: String,
}

/// Query parameters for an item image replacement.
#[derive(Debug, Deserialize)]
pub struct ImageReplaceQuery {
    /// Original file name.
    pub file_name: String,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

/// Maps a service failure to a status code by its root cause.
fn service_error(context: &str, error: &anyhow::Error) -> (StatusCode, Json<ApiError>) {
    let details = format!("{error:#}");
    let status = if error.downcast_ref::<FileRejection>().is_some()
        || error.downcast_ref::<InvalidInput>().is_some()
    {
        StatusCode::BAD_REQUEST
    } else if matches!(
        error.downcast_ref::<StoreError>(),
        Some(StoreError::RecordNotFound { .. })
    ) {
        StatusCode::NOT_FOUND
    } else {
        warn!(error = %details, "{}", context);
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(ApiError::with_details(context, details)))
}

fn not_found(what: &str, id: &str) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(format!("{what} not found: {id}"))),
    )
}

/// Rejects the request unless it carries the active session token.
fn require_admin(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();

    if state.services.auth.is_authenticated(token) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new("Authentication required")),
        ))
    }
}

fn upload_from(headers: &HeaderMap, file_name: &str, body: Bytes) -> UploadedFile {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());
    UploadedFile::new(file_name, content_type, body.to_vec())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/admin/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    match state.services.auth.login(&request.username, &request.password) {
        Ok(token) => Ok(Json(LoginResponse { token })),
        Err(AuthError::NotConfigured) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("Admin login is not configured")),
        )),
        Err(AuthError::InvalidCredentials) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new("Invalid credentials")),
        )),
        Err(AuthError::Storage(e)) => Err(service_error("Failed to start session", &e)),
    }
}

/// POST /api/admin/logout
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    require_admin(&state, &headers)?;
    state.services.auth.logout().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::with_details("Failed to end session", e.to_string())),
        )
    })?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/hero-images
async fn list_hero_images(State(state): State<AppState>) -> ApiResult<Json<HeroImageListResponse>> {
    let images = state
        .services
        .hero_images
        .load()
        .map_err(|e| service_error("Failed to load hero images", &e))?;
    let count = images.len();
    Ok(Json(HeroImageListResponse { images, count }))
}

/// POST /api/hero-images - Body is the raw file.
async fn upload_hero_image(
    State(state): State<AppState>,
    Query(query): Query<HeroUploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<HeroImage>)> {
    require_admin(&state, &headers)?;
    let service = &state.services.hero_images;

    let current = service
        .load()
        .map_err(|e| service_error("Failed to load hero images", &e))?
        .len();
    let file = upload_from(&headers, &query.file_name, body);

    let image = service
        .upload(&file, &query.title, current)
        .map_err(|e| service_error("Failed to upload hero image", &e))?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// PUT /api/hero-images/{id}
async fn update_hero_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<HeroTitleRequest>,
) -> ApiResult<Json<HeroImage>> {
    require_admin(&state, &headers)?;
    let image = state
        .services
        .hero_images
        .update_title(&id, &request.title)
        .map_err(|e| service_error("Failed to update hero image", &e))?;
    Ok(Json(image))
}

/// DELETE /api/hero-images/{id}
async fn delete_hero_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    require_admin(&state, &headers)?;
    let service = &state.services.hero_images;

    let image = service
        .find(&id)
        .map_err(|e| service_error("Failed to load hero image", &e))?
        .ok_or_else(|| not_found("Hero image", &id))?;
    service
        .delete(&image)
        .map_err(|e| service_error("Failed to delete hero image", &e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/categories
async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<CategoryListResponse>> {
    let categories = state
        .services
        .collections
        .load_categories()
        .map_err(|e| service_error("Failed to load categories", &e))?;
    let count = categories.len();
    Ok(Json(CategoryListResponse { categories, count }))
}

/// POST /api/categories
async fn create_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<CollectionCategory>)> {
    require_admin(&state, &headers)?;
    let service = &state.services.collections;

    let order = match request.order {
        Some(order) => order,
        None => next_order(
            service
                .load_categories()
                .map_err(|e| service_error("Failed to load categories", &e))?
                .len(),
        ),
    };

    let category = service
        .create_category(&request.name, order)
        .map_err(|e| service_error("Failed to create category", &e))?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id}
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(update): Json<CategoryUpdate>,
) -> ApiResult<Json<CollectionCategory>> {
    require_admin(&state, &headers)?;
    let category = state
        .services
        .collections
        .update_category(&id, &update)
        .map_err(|e| service_error("Failed to update category", &e))?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - Soft delete.
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    require_admin(&state, &headers)?;
    state
        .services
        .collections
        .delete_category(&id)
        .map_err(|e| service_error("Failed to delete category", &e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/items
async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> ApiResult<Json<ItemListResponse>> {
    let items = state
        .services
        .collections
        .load_items(query.category.as_deref())
        .map_err(|e| service_error("Failed to load items", &e))?;
    let count = items.len();
    Ok(Json(ItemListResponse { items, count }))
}

/// POST /api/items - Body is the raw file.
async fn upload_item(
    State(state): State<AppState>,
    Query(query): Query<ItemUploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CollectionItem>)> {
    require_admin(&state, &headers)?;
    let service = &state.services.collections;

    let current = service
        .load_items(None)
        .map_err(|e| service_error("Failed to load items", &e))?
        .len();
    let file = upload_from(&headers, &query.file_name, body);

    let item = service
        .upload_item(&file, &query.title, &query.location, &query.category, current)
        .map_err(|e| service_error("Failed to upload item", &e))?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/items/{id}
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(update): Json<ItemUpdate>,
) -> ApiResult<Json<CollectionItem>> {
    require_admin(&state, &headers)?;
    let item = state
        .services
        .collections
        .update_item(&id, &update, None)
        .map_err(|e| service_error("Failed to update item", &e))?;
    Ok(Json(item))
}

/// PUT /api/items/{id}/image - Body is the raw file. The previous image is
/// removed once the record points at the new one.
async fn replace_item_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ImageReplaceQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<CollectionItem>> {
    require_admin(&state, &headers)?;
    let file = upload_from(&headers, &query.file_name, body);

    let item = state
        .services
        .collections
        .update_item(&id, &ItemUpdate::default(), Some(&file))
        .map_err(|e| service_error("Failed to replace item image", &e))?;
    Ok(Json(item))
}

/// DELETE /api/items/{id}
async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    require_admin(&state, &headers)?;
    let service = &state.services.collections;

    let item = service
        .find_item(&id)
        .map_err(|e| service_error("Failed to load item", &e))?
        .ok_or_else(|| not_found("Item", &id))?;
    service
        .delete_item(&item)
        .map_err(|e| service_error("Failed to delete item", &e))?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // Oversized uploads must reach the validator so clients get its message
    // instead of a bare 413.
    let max_upload = state.services.hero_images.validator().max_bytes();
    let body_limit = usize::try_from(max_upload.saturating_mul(2)).unwrap_or(usize::MAX);
    let media = ServeDir::new(&state.services.media_root);

    Router::new()
        .route("/health", get(health_check))
        // Session endpoints
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
        // Hero image endpoints
        .route(
            "/api/hero-images",
            get(list_hero_images).post(upload_hero_image),
        )
        .route(
            "/api/hero-images/{id}",
            put(update_hero_image).delete(delete_hero_image),
        )
        // Collection endpoints
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/api/items", get(list_items).post(upload_item))
        .route("/api/items/{id}", put(update_item).delete(delete_item))
        .route("/api/items/{id}/image", put(replace_item_image))
        .nest_service("/media", media)
        .layer(DefaultBodyLimit::max(body_limit))
        // The admin frontend is served from another origin during development.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Arguments
///
/// * `config` - Application configuration
/// * `data_dir` - Directory holding records, media and the session file
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an error if the data directory cannot be opened or the server
/// fails to start.
pub async fn run_server(config: Config, data_dir: &FsPath, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::open(&config, data_dir)?;
    let app = create_router(state);

    info!("Starting Villa Showcase admin API on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
