//! Maintenance record model

use chrono::{DateTime, Utc};
use common::pagination::{ListQuery, Sort, SortColumn, SortDirection};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Progress of a maintenance record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "record_status", rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    InProgress,
    OnHold,
    Finished,
    Failed,
    #[serde(alias = "cancelled")]
    Canceled,
}

/// Maintenance record entity
///
/// `asset_name` and `performed_by_name` are joined in at read time and are
/// never written.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub asset_name: String,
    pub schedule_id: Option<Uuid>,
    pub performed_by: Option<Uuid>,
    pub performed_by_name: Option<String>,
    pub description: String,
    pub status: RecordStatus,
    pub maintenance_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMaintenanceRecord {
    pub id: Option<Uuid>,
    pub asset_id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub performed_by: Option<Uuid>,
    pub description: String,
    pub status: RecordStatus,
    pub maintenance_date: DateTime<Utc>,
}

/// Record update payload
///
/// The optional references are doubly wrapped: `None` leaves the stored
/// value alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceRecordPatch {
    pub asset_id: Option<Uuid>,
    pub schedule_id: Option<Option<Uuid>>,
    pub performed_by: Option<Option<Uuid>>,
    pub description: Option<String>,
    pub status: Option<RecordStatus>,
    pub maintenance_date: Option<DateTime<Utc>>,
}

impl MaintenanceRecordPatch {
    pub fn apply(self, record: &mut MaintenanceRecord) {
        if let Some(asset_id) = self.asset_id {
            record.asset_id = asset_id;
        }
        if let Some(schedule_id) = self.schedule_id {
            record.schedule_id = schedule_id;
        }
        if let Some(performed_by) = self.performed_by {
            record.performed_by = performed_by;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(date) = self.maintenance_date {
            record.maintenance_date = date;
        }
    }

    /// Schedule id that must exist for this patch to be valid
    pub fn referenced_schedule(&self) -> Option<Uuid> {
        self.schedule_id.flatten()
    }

    /// Performer id that must exist for this patch to be valid
    pub fn referenced_performer(&self) -> Option<Uuid> {
        self.performed_by.flatten()
    }
}

/// Filters for listing records; `schedule_ids` matches any of the given ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceRecordFilter {
    pub asset_id: Option<Uuid>,
    pub schedule_ids: Vec<Uuid>,
    pub status: Option<RecordStatus>,
}

/// Sortable record columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceRecordSortField {
    Id,
    AssetId,
    ScheduleId,
    PerformedBy,
    Status,
    MaintenanceDate,
    CreatedAt,
    UpdatedAt,
}

impl MaintenanceRecordSortField {
    /// Ordering used when the caller does not choose a column
    pub const DEFAULT_SORT: Sort<Self> = Sort {
        field: MaintenanceRecordSortField::MaintenanceDate,
        direction: SortDirection::Desc,
    };
}

impl SortColumn for MaintenanceRecordSortField {
    const TIE_BREAKER: &'static str = "r.id";

    fn column(self) -> &'static str {
        match self {
            MaintenanceRecordSortField::Id => "r.id",
            MaintenanceRecordSortField::AssetId => "r.asset_id",
            MaintenanceRecordSortField::ScheduleId => "r.schedule_id",
            MaintenanceRecordSortField::PerformedBy => "r.performed_by",
            MaintenanceRecordSortField::Status => "r.status",
            MaintenanceRecordSortField::MaintenanceDate => "r.maintenance_date",
            MaintenanceRecordSortField::CreatedAt => "r.created_at",
            MaintenanceRecordSortField::UpdatedAt => "r.updated_at",
        }
    }
}

pub type MaintenanceRecordQuery = ListQuery<MaintenanceRecordFilter, MaintenanceRecordSortField>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_alias() {
        let legacy: RecordStatus = serde_json::from_str("\"cancelled\"").unwrap();
        let current: RecordStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(legacy, RecordStatus::Canceled);
        assert_eq!(current, RecordStatus::Canceled);
        assert_eq!(serde_json::to_string(&legacy).unwrap(), "\"canceled\"");
    }

    #[test]
    fn test_patch_clears_references() {
        let mut record = MaintenanceRecord {
            id: Uuid::new_v4(),
            asset_id: Uuid::new_v4(),
            asset_name: "Pump".to_string(),
            schedule_id: Some(Uuid::new_v4()),
            performed_by: Some(Uuid::new_v4()),
            performed_by_name: Some("Tech".to_string()),
            description: "Replaced seals".to_string(),
            status: RecordStatus::Pending,
            maintenance_date: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let performer = record.performed_by;

        let patch = MaintenanceRecordPatch {
            schedule_id: Some(None),
            ..Default::default()
        };
        assert_eq!(patch.referenced_schedule(), None);
        patch.apply(&mut record);

        assert_eq!(record.schedule_id, None);
        assert_eq!(record.performed_by, performer);
    }
}
