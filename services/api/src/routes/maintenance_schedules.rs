//! Maintenance schedule handlers

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
    models::{
        MaintenanceScheduleFilter, MaintenanceSchedulePatch, MaintenanceScheduleSortField,
        NewMaintenanceSchedule, ScheduleType,
    },
    state::AppState,
    validation::validate_interval_days,
};

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub id: Option<Uuid>,
    pub asset_id: Uuid,
    pub schedule_type: ScheduleType,
    pub interval_days: Option<i32>,
    pub next_maintenance_date: DateTime<Utc>,
    /// Defaults to the caller
    pub scheduled_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScheduleRequest {
    pub asset_id: Option<Uuid>,
    pub schedule_type: Option<ScheduleType>,
    pub interval_days: Option<i32>,
    pub next_maintenance_date: Option<DateTime<Utc>>,
    pub scheduled_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ListSchedulesParams {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub sort_by: Option<MaintenanceScheduleSortField>,
    pub sort_dir: Option<SortDirection>,
    pub asset_id: Option<Uuid>,
    pub schedule_type: Option<ScheduleType>,
    /// Inclusive lower bound on `next_maintenance_date`
    pub next_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `next_maintenance_date`
    pub next_to: Option<DateTime<Utc>>,
}

pub async fn list_schedules(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    WithRejection(Query(params), _): WithRejection<Query<ListSchedulesParams>, ApiError>,
) -> ApiResult<Json<Value>> {
    let query = list_query(
        MaintenanceScheduleFilter {
            asset_id: params.asset_id,
            schedule_type: params.schedule_type,
            next_from: params.next_from,
            next_to: params.next_to,
        },
        params.page,
        params.items_per_page,
        params.sort_by,
        params.sort_dir,
    )?;

    let page = state.schedules.list(&query).await?;
    page_response(
        "Maintenance schedules retrieved successfully",
        "maintenance_schedules",
        page,
    )
}

pub async fn get_schedule(
    State(state): State<AppState>,
    _auth: Authorized<AnyRole>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    let schedule = state.schedules.get(id).await?;
    entity_response(
        "Maintenance schedule retrieved successfully",
        "maintenance_schedule",
        schedule,
    )
}

pub async fn create_schedule(
    State(state): State<AppState>,
    auth: Authorized<AdminTier>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateScheduleRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    check(validate_interval_days(payload.interval_days))?;

    let schedule = state
        .schedules
        .create(NewMaintenanceSchedule {
            id: payload.id,
            asset_id: payload.asset_id,
            schedule_type: payload.schedule_type,
            interval_days: payload.interval_days,
            next_maintenance_date: payload.next_maintenance_date,
            scheduled_by: Some(payload.scheduled_by.unwrap_or(auth.user.id)),
            assigned_to: payload.assigned_to,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        entity_response(
            "Maintenance schedule created successfully",
            "maintenance_schedule",
            schedule,
        )?,
    ))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateScheduleRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    check(validate_interval_days(payload.interval_days))?;

    let patch = MaintenanceSchedulePatch {
        asset_id: payload.asset_id,
        schedule_type: payload.schedule_type,
        interval_days: payload.interval_days,
        next_maintenance_date: payload.next_maintenance_date,
        scheduled_by: payload.scheduled_by,
        assigned_to: payload.assigned_to,
    };
    let schedule = state.schedules.update(id, patch).await?;
    entity_response(
        "Maintenance schedule updated successfully",
        "maintenance_schedule",
        schedule,
    )
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    state.schedules.delete(id).await?;
    Ok(message_response("Maintenance schedule deleted successfully"))
}
