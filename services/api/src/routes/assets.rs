//! Asset handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use common::pagination::SortDirection;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{check, entity_response, list_query, message_response, page_response};
use crate::{
    auth::{AdminTier, AnyRole, Authorized},
    error::{ApiError, ApiResult},
    models::{AssetFilter, AssetPatch, AssetSortField, AssetStatus, NewAsset},
    state::AppState,
    validation::{validate_max_len, validate_name},
};

#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub category_id: Uuid,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub condition: Option<String>,
    pub status: AssetStatus,
    /// Defaults to the caller
    pub added_by: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssetRequest {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub condition: Option<String>,
    pub status: Option<AssetStatus>,
    pub added_by: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssetStatusRequest {
    pub status: AssetStatus,
}

#[derive(Debug, Deserialize)]
pub struct ListAssetsParams {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub sort_by: Option<AssetSortField>,
    pub sort_dir: Option<SortDirection>,
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub status: Option<AssetStatus>,
}

fn validate_details(location: Option<&str>, condition: Option<&str>) -> ApiResult<()> {
    check(validate_max_len("Location", location, 100))?;
    check(validate_max_len("Condition", condition, 50))
}

pub async fn list_assets(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    WithRejection(Query(params), _): WithRejection<Query<ListAssetsParams>, ApiError>,
) -> ApiResult<Json<Value>> {
    let query = list_query(
        AssetFilter {
            search: params.search,
            category_id: params.category_id,
            status: params.status,
        },
        params.page,
        params.items_per_page,
        params.sort_by,
        params.sort_dir,
    )?;

    let page = state.assets.list(&query).await?;
    page_response("Assets retrieved successfully", "assets", page)
}

pub async fn get_asset(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    let asset = state.assets.get(id).await?;
    entity_response("Asset retrieved successfully", "asset", asset)
}

pub async fn create_asset(
    State(state): State<AppState>,
    auth: Authorized<AdminTier>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateAssetRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    check(validate_name("Name", &payload.name))?;
    validate_details(payload.location.as_deref(), payload.condition.as_deref())?;

    let asset = state
        .assets
        .create(NewAsset {
            id: payload.id,
            name: payload.name,
            category_id: payload.category_id,
            location: payload.location,
            purchase_date: payload.purchase_date,
            last_maintenance_date: payload.last_maintenance_date,
            condition: payload.condition,
            status: payload.status,
            added_by: Some(payload.added_by.unwrap_or(auth.user.id)),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        entity_response("Asset created successfully", "asset", asset)?,
    ))
}

pub async fn update_asset(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateAssetRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    if let Some(name) = &payload.name {
        check(validate_name("Name", name))?;
    }
    validate_details(payload.location.as_deref(), payload.condition.as_deref())?;

    let patch = AssetPatch {
        name: payload.name,
        category_id: payload.category_id,
        location: payload.location,
        purchase_date: payload.purchase_date,
        last_maintenance_date: payload.last_maintenance_date,
        condition: payload.condition,
        status: payload.status,
        added_by: payload.added_by,
    };
    let asset = state.assets.update(id, patch).await?;
    entity_response("Asset updated successfully", "asset", asset)
}

pub async fn update_asset_status(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateAssetStatusRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    let asset = state.assets.update_status(id, payload.status).await?;
    entity_response("Asset status updated successfully", "asset", asset)
}

pub async fn delete_asset(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    state.assets.delete(id).await?;
    Ok(message_response("Asset deleted successfully"))
}
