//! Asset category model

use chrono::{DateTime, Utc};
use common::pagination::{ListQuery, Sort, SortColumn, SortDirection};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Asset category entity
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AssetCategory {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New asset category payload
#[derive(Debug, Clone)]
pub struct NewAssetCategory {
    pub id: Option<Uuid>,
    pub name: String,
}

/// Asset category update payload
#[derive(Debug, Clone, Default)]
pub struct AssetCategoryPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetCategoryFilter {
    pub search: Option<String>,
}

/// Sortable asset category columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategorySortField {
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

impl AssetCategorySortField {
    /// Ordering used when the caller does not choose a column
    pub const DEFAULT_SORT: Sort<Self> = Sort {
        field: AssetCategorySortField::Name,
        direction: SortDirection::Asc,
    };
}

impl SortColumn for AssetCategorySortField {
    const TIE_BREAKER: &'static str = "id";

    fn column(self) -> &'static str {
        match self {
            AssetCategorySortField::Id => "id",
            AssetCategorySortField::Name => "name",
            AssetCategorySortField::CreatedAt => "created_at",
            AssetCategorySortField::UpdatedAt => "updated_at",
        }
    }
}

pub type AssetCategoryQuery = ListQuery<AssetCategoryFilter, AssetCategorySortField>;
