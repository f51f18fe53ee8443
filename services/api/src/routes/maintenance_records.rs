//! Maintenance record handlers

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

use super::{
    check, double_option, entity_response, list_query, message_response, page_response,
    parse_uuid_list,
};
use crate::{
    auth::{AdminTier, AnyRole, Authorized, RecordStatusWriter},
    error::{ApiError, ApiResult},
    models::{
        MaintenanceRecordFilter, MaintenanceRecordPatch, MaintenanceRecordSortField,
        NewMaintenanceRecord, RecordStatus,
    },
    state::AppState,
    validation::validate_description,
};

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub id: Option<Uuid>,
    pub asset_id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub performed_by: Option<Uuid>,
    pub description: String,
    pub status: RecordStatus,
    pub maintenance_date: DateTime<Utc>,
}

/// `schedule_id` and `performed_by` accept `null` to clear the reference
#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    pub asset_id: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    pub schedule_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub performed_by: Option<Option<Uuid>>,
    pub description: Option<String>,
    pub status: Option<RecordStatus>,
    pub maintenance_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecordStatusRequest {
    pub status: RecordStatus,
}

#[derive(Debug, Deserialize)]
pub struct ListRecordsParams {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub sort_by: Option<MaintenanceRecordSortField>,
    pub sort_dir: Option<SortDirection>,
    pub asset_id: Option<Uuid>,
    /// Comma-separated schedule ids
    pub schedule_id: Option<String>,
    pub status: Option<RecordStatus>,
}

pub async fn list_records(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    WithRejection(Query(params), _): WithRejection<Query<ListRecordsParams>, ApiError>,
) -> ApiResult<Json<Value>> {
    let schedule_ids = parse_uuid_list("schedule_id", params.schedule_id.as_deref())?;
    let query = list_query(
        MaintenanceRecordFilter {
            asset_id: params.asset_id,
            schedule_ids,
            status: params.status,
        },
        params.page,
        params.items_per_page,
        params.sort_by,
        params.sort_dir,
    )?;

    let page = state.records.list(&query).await?;
    page_response(
        "Maintenance records retrieved successfully",
        "maintenance_records",
        page,
    )
}

pub async fn get_record(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    let record = state.records.get(id).await?;
    entity_response(
        "Maintenance record retrieved successfully",
        "maintenance_record",
        record,
    )
}

pub async fn create_record(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateRecordRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    check(validate_description(&payload.description))?;

    let record = state
        .records
        .create(NewMaintenanceRecord {
            id: payload.id,
            asset_id: payload.asset_id,
            schedule_id: payload.schedule_id,
            performed_by: payload.performed_by,
            description: payload.description,
            status: payload.status,
            maintenance_date: payload.maintenance_date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        entity_response(
            "Maintenance record created successfully",
            "maintenance_record",
            record,
        )?,
    ))
}

pub async fn update_record(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateRecordRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    if let Some(description) = &payload.description {
        check(validate_description(description))?;
    }

    let patch = MaintenanceRecordPatch {
        asset_id: payload.asset_id,
        schedule_id: payload.schedule_id,
        performed_by: payload.performed_by,
        description: payload.description,
        status: payload.status,
        maintenance_date: payload.maintenance_date,
    };
    let record = state.records.update(id, patch).await?;
    entity_response(
        "Maintenance record updated successfully",
        "maintenance_record",
        record,
    )
}

pub async fn update_record_status(
    State(state): State<AppState>,
    _auth: Authorized<RecordStatusWriter>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateRecordStatusRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    let record = state.records.update_status(id, payload.status).await?;
    entity_response(
        "Maintenance record status updated successfully",
        "maintenance_record",
        record,
    )
}

pub async fn delete_record(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    state.records.delete(id).await?;
    Ok(message_response("Maintenance record deleted successfully"))
}
