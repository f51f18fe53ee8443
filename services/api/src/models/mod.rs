//! Domain models

pub mod asset;
pub mod asset_category;
pub mod maintenance_record;
pub mod maintenance_schedule;
pub mod role;
pub mod user;

pub use asset::{Asset, AssetFilter, AssetPatch, AssetQuery, AssetSortField, AssetStatus, NewAsset};
pub use asset_category::{
    AssetCategory, AssetCategoryFilter, AssetCategoryPatch, AssetCategoryQuery,
    AssetCategorySortField, NewAssetCategory,
};
pub use maintenance_record::{
    MaintenanceRecord, MaintenanceRecordFilter, MaintenanceRecordPatch, MaintenanceRecordQuery,
    MaintenanceRecordSortField, NewMaintenanceRecord, RecordStatus,
};
pub use maintenance_schedule::{
    MaintenanceSchedule, MaintenanceScheduleFilter, MaintenanceSchedulePatch,
    MaintenanceScheduleQuery, MaintenanceScheduleSortField, NewMaintenanceSchedule, ScheduleType,
};
pub use role::{ADMIN_TIER, Role};
pub use user::{LoginCredentials, NewUser, User, UserFilter, UserPatch, UserQuery, UserSortField};
