//! Repositories for database operations
//!
//! Each entity has a gateway trait and a PostgreSQL implementation. Services
//! depend on the traits only, so tests can swap in mocks or the in-memory
//! store.

pub mod asset;
pub mod asset_category;
pub mod maintenance_record;
pub mod maintenance_schedule;
pub mod user;

#[cfg(test)]
pub mod memory;

pub use asset::{AssetRepository, PgAssetRepository};
pub use asset_category::{AssetCategoryRepository, PgAssetCategoryRepository};
pub use maintenance_record::{MaintenanceRecordRepository, PgMaintenanceRecordRepository};
pub use maintenance_schedule::{MaintenanceScheduleRepository, PgMaintenanceScheduleRepository};
pub use user::{PgUserRepository, UserRepository};

use sqlx::{Postgres, QueryBuilder};

/// Appends `WHERE` before the first condition and `AND` before the rest
pub(crate) struct Conditions {
    any: bool,
}

impl Conditions {
    pub(crate) fn new() -> Self {
        Self { any: false }
    }

    pub(crate) fn push<'a>(&mut self, builder: &mut QueryBuilder<'a, Postgres>) {
        builder.push(if self.any { " AND " } else { " WHERE " });
        self.any = true;
    }
}

/// `%term%` pattern for `ILIKE`, with LIKE wildcards in the term escaped
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
