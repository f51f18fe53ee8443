//! Maintenance schedule model

use chrono::{DateTime, Utc};
use common::pagination::{ListQuery, Sort, SortColumn, SortDirection};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How a schedule is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "schedule_type", rename_all = "snake_case")]
pub enum ScheduleType {
    Periodic,
    Conditional,
}

/// Maintenance schedule entity, with the asset name joined in for display
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MaintenanceSchedule {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub asset_name: String,
    pub schedule_type: ScheduleType,
    pub interval_days: Option<i32>,
    pub next_maintenance_date: DateTime<Utc>,
    pub scheduled_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMaintenanceSchedule {
    pub id: Option<Uuid>,
    pub asset_id: Uuid,
    pub schedule_type: ScheduleType,
    pub interval_days: Option<i32>,
    pub next_maintenance_date: DateTime<Utc>,
    pub scheduled_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct MaintenanceSchedulePatch {
    pub asset_id: Option<Uuid>,
    pub schedule_type: Option<ScheduleType>,
    pub interval_days: Option<i32>,
    pub next_maintenance_date: Option<DateTime<Utc>>,
    pub scheduled_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

impl MaintenanceSchedulePatch {
    pub fn apply(self, schedule: &mut MaintenanceSchedule) {
        if let Some(asset_id) = self.asset_id {
            schedule.asset_id = asset_id;
        }
        if let Some(schedule_type) = self.schedule_type {
            schedule.schedule_type = schedule_type;
        }
        if self.interval_days.is_some() {
            schedule.interval_days = self.interval_days;
        }
        if let Some(next) = self.next_maintenance_date {
            schedule.next_maintenance_date = next;
        }
        if self.scheduled_by.is_some() {
            schedule.scheduled_by = self.scheduled_by;
        }
        if self.assigned_to.is_some() {
            schedule.assigned_to = self.assigned_to;
        }
    }
}

/// Filters for listing schedules; date bounds are inclusive and independent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceScheduleFilter {
    pub asset_id: Option<Uuid>,
    pub schedule_type: Option<ScheduleType>,
    pub next_from: Option<DateTime<Utc>>,
    pub next_to: Option<DateTime<Utc>>,
}

/// Sortable schedule columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceScheduleSortField {
    Id,
    AssetId,
    ScheduleType,
    IntervalDays,
    NextMaintenanceDate,
    ScheduledBy,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}

impl MaintenanceScheduleSortField {
    /// Ordering used when the caller does not choose a column
    pub const DEFAULT_SORT: Sort<Self> = Sort {
        field: MaintenanceScheduleSortField::NextMaintenanceDate,
        direction: SortDirection::Asc,
    };
}

impl SortColumn for MaintenanceScheduleSortField {
    const TIE_BREAKER: &'static str = "s.id";

    fn column(self) -> &'static str {
        match self {
            MaintenanceScheduleSortField::Id => "s.id",
            MaintenanceScheduleSortField::AssetId => "s.asset_id",
            MaintenanceScheduleSortField::ScheduleType => "s.schedule_type",
            MaintenanceScheduleSortField::IntervalDays => "s.interval_days",
            MaintenanceScheduleSortField::NextMaintenanceDate => "s.next_maintenance_date",
            MaintenanceScheduleSortField::ScheduledBy => "s.scheduled_by",
            MaintenanceScheduleSortField::AssignedTo => "s.assigned_to",
            MaintenanceScheduleSortField::CreatedAt => "s.created_at",
            MaintenanceScheduleSortField::UpdatedAt => "s.updated_at",
        }
    }
}

pub type MaintenanceScheduleQuery =
    ListQuery<MaintenanceScheduleFilter, MaintenanceScheduleSortField>;
