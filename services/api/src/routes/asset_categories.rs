//! Asset category handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use common::pagination::SortDirection;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{check, entity_response, list_query, message_response, page_response};
use crate::{
    auth::{AdminTier, AnyRole, Authorized},
    error::{ApiError, ApiResult},
    models::{AssetCategoryFilter, AssetCategoryPatch, AssetCategorySortField, NewAssetCategory},
    state::AppState,
    validation::validate_name,
};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub id: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListCategoriesParams {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub sort_by: Option<AssetCategorySortField>,
    pub sort_dir: Option<SortDirection>,
    pub search: Option<String>,
}

pub async fn list_categories(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    WithRejection(Query(params), _): WithRejection<Query<ListCategoriesParams>, ApiError>,
) -> ApiResult<Json<Value>> {
    let query = list_query(
        AssetCategoryFilter {
            search: params.search,
        },
        params.page,
        params.items_per_page,
        params.sort_by,
        params.sort_dir,
    )?;

    let page = state.categories.list(&query).await?;
    page_response("Asset categories retrieved successfully", "asset_categories", page)
}

pub async fn get_category(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    let category = state.categories.get(id).await?;
    entity_response("Asset category retrieved successfully", "asset_category", category)
}

pub async fn create_category(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateCategoryRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    check(validate_name("Name", &payload.name))?;

    let category = state
        .categories
        .create(NewAssetCategory {
            id: payload.id,
            name: payload.name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        entity_response("Asset category created successfully", "asset_category", category)?,
    ))
}

pub async fn update_category(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateCategoryRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    if let Some(name) = &payload.name {
        check(validate_name("Name", name))?;
    }

    let category = state
        .categories
        .update(id, AssetCategoryPatch { name: payload.name })
        .await?;
    entity_response("Asset category updated successfully", "asset_category", category)
}

pub async fn delete_category(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    state.categories.delete(id).await?;
    Ok(message_response("Asset category deleted successfully"))
}
