//! Asset model

use chrono::{DateTime, Utc};
use common::pagination::{ListQuery, Sort, SortColumn, SortDirection};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Operational status of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "asset_status", rename_all = "snake_case")]
pub enum AssetStatus {
    Ready,
    UnderMaintenance,
    NeedMaintenance,
}

/// Asset entity, with the category name joined in for display
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub condition: Option<String>,
    pub status: AssetStatus,
    pub added_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New asset payload
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub id: Option<Uuid>,
    pub name: String,
    pub category_id: Uuid,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub condition: Option<String>,
    pub status: AssetStatus,
    pub added_by: Option<Uuid>,
}

/// Asset update payload; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub location: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub condition: Option<String>,
    pub status: Option<AssetStatus>,
    pub added_by: Option<Uuid>,
}

impl AssetPatch {
    /// Apply the patch on top of a stored asset
    pub fn apply(self, asset: &mut Asset) {
        if let Some(name) = self.name {
            asset.name = name;
        }
        if let Some(category_id) = self.category_id {
            asset.category_id = category_id;
        }
        if self.location.is_some() {
            asset.location = self.location;
        }
        if self.purchase_date.is_some() {
            asset.purchase_date = self.purchase_date;
        }
        if self.last_maintenance_date.is_some() {
            asset.last_maintenance_date = self.last_maintenance_date;
        }
        if self.condition.is_some() {
            asset.condition = self.condition;
        }
        if let Some(status) = self.status {
            asset.status = status;
        }
        if self.added_by.is_some() {
            asset.added_by = self.added_by;
        }
    }
}

/// Filters for listing assets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetFilter {
    /// Case-insensitive substring of name, location or condition
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub status: Option<AssetStatus>,
}

/// Sortable asset columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSortField {
    Id,
    Name,
    CategoryId,
    Location,
    PurchaseDate,
    LastMaintenanceDate,
    Condition,
    Status,
    AddedBy,
    CreatedAt,
    UpdatedAt,
}

impl AssetSortField {
    /// Ordering used when the caller does not choose a column
    pub const DEFAULT_SORT: Sort<Self> = Sort {
        field: AssetSortField::CreatedAt,
        direction: SortDirection::Desc,
    };
}

impl SortColumn for AssetSortField {
    const TIE_BREAKER: &'static str = "a.id";

    fn column(self) -> &'static str {
        match self {
            AssetSortField::Id => "a.id",
            AssetSortField::Name => "a.name",
            AssetSortField::CategoryId => "a.category_id",
            AssetSortField::Location => "a.location",
            AssetSortField::PurchaseDate => "a.purchase_date",
            AssetSortField::LastMaintenanceDate => "a.last_maintenance_date",
            AssetSortField::Condition => "a.condition",
            AssetSortField::Status => "a.status",
            AssetSortField::AddedBy => "a.added_by",
            AssetSortField::CreatedAt => "a.created_at",
            AssetSortField::UpdatedAt => "a.updated_at",
        }
    }
}

pub type AssetQuery = ListQuery<AssetFilter, AssetSortField>;
