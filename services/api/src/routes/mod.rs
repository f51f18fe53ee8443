//! API service routes

use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use common::pagination::{ListQuery, Page, PageRequest, SortColumn, SortDirection};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    auth::auth_middleware,
    error::{ApiError, ApiResult},
    state::AppState,
};

mod asset_categories;
mod assets;
mod auth;
mod maintenance_records;
mod maintenance_schedules;
mod users;

/// Create the router for the API service
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let protected_routes = Router::new()
        .route("/me", get(auth::me))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/asset-categories",
            get(asset_categories::list_categories).post(asset_categories::create_category),
        )
        .route(
            "/asset-categories/:id",
            get(asset_categories::get_category)
                .put(asset_categories::update_category)
                .delete(asset_categories::delete_category),
        )
        .route("/assets", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/assets/:id",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/assets/:id/status", put(assets::update_asset_status))
        .route(
            "/maintenance-schedules",
            get(maintenance_schedules::list_schedules)
                .post(maintenance_schedules::create_schedule),
        )
        .route(
            "/maintenance-schedules/:id",
            get(maintenance_schedules::get_schedule)
                .put(maintenance_schedules::update_schedule)
                .delete(maintenance_schedules::delete_schedule),
        )
        .route(
            "/maintenance-records",
            get(maintenance_records::list_records).post(maintenance_records::create_record),
        )
        .route(
            "/maintenance-records/:id",
            get(maintenance_records::get_record)
                .put(maintenance_records::update_record)
                .delete(maintenance_records::delete_record),
        )
        .route(
            "/maintenance-records/:id/status",
            put(maintenance_records::update_record_status),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let v1 = Router::new()
        .route("/login", post(auth::login))
        .merge(protected_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match common::database::health_check(&state.db_pool).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "service": "api-service" })),
        ),
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "service": "api-service" })),
        ),
    }
}

/// `{"message": ..., "<key>": entity}`
pub(crate) fn entity_response<T: Serialize>(message: &str, key: &str, entity: T) -> ApiResult<Json<Value>> {
    let entity = serde_json::to_value(entity).map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut body = Map::new();
    body.insert("message".to_string(), Value::from(message));
    body.insert(key.to_string(), entity);
    Ok(Json(Value::Object(body)))
}

/// `{"message": ..., "<key>": [...], "total_items", "page", "items_per_page", "total_pages"}`
pub(crate) fn page_response<T: Serialize>(message: &str, key: &str, page: Page<T>) -> ApiResult<Json<Value>> {
    let total_pages = page.total_pages();
    let items = serde_json::to_value(&page.items).map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut body = Map::new();
    body.insert("message".to_string(), Value::from(message));
    body.insert(key.to_string(), items);
    body.insert("total_items".to_string(), Value::from(page.total_items));
    body.insert("page".to_string(), Value::from(page.page));
    body.insert("items_per_page".to_string(), Value::from(page.items_per_page));
    body.insert("total_pages".to_string(), Value::from(total_pages));
    Ok(Json(Value::Object(body)))
}

/// `{"message": ...}`
pub(crate) fn message_response(message: &str) -> Json<Value> {
    Json(json!({ "message": message }))
}

/// Turn raw list parameters into a validated [`ListQuery`]
///
/// A lone `sort_dir` reverses or confirms the resource's default column.
pub(crate) fn list_query<F, S: SortColumn>(
    filter: F,
    page: Option<u32>,
    items_per_page: Option<u32>,
    sort_by: Option<S>,
    sort_dir: Option<SortDirection>,
) -> ApiResult<ListQuery<F, S>> {
    let page = PageRequest::new(page, items_per_page).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(ListQuery {
        filter,
        page,
        sort_by,
        sort_dir,
    })
}

/// Deserialize a field that distinguishes "absent" from "null"
///
/// Use with `#[serde(default)]`: absent gives `None`, `null` gives
/// `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parse a comma-separated list of UUIDs, ignoring empty segments
pub(crate) fn parse_uuid_list(field: &str, raw: Option<&str>) -> ApiResult<Vec<Uuid>> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| ApiError::BadRequest(format!("Invalid {field}: {s}")))
        })
        .collect()
}

/// Run a boundary check, turning its message into a 400
pub(crate) fn check(result: Result<(), String>) -> ApiResult<()> {
    result.map_err(ApiError::BadRequest)
}
