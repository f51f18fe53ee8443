//! In-memory store used by service and router tests
//!
//! Implements every gateway trait on one shared set of tables, mirroring the
//! constraints the PostgreSQL schema enforces (unique email, restricted
//! category delete, cascading asset delete) and the default list orderings.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use common::pagination::{PageRequest, Sort, SortColumn, SortDirection};
use uuid::Uuid;

use super::{
    AssetCategoryRepository, AssetRepository, MaintenanceRecordRepository,
    MaintenanceScheduleRepository, UserRepository,
};
use crate::models::{
    Asset, AssetCategory, AssetCategoryQuery, AssetCategorySortField, AssetQuery,
    AssetSortField, AssetStatus, MaintenanceRecord, MaintenanceRecordQuery,
    MaintenanceRecordSortField, MaintenanceSchedule, MaintenanceScheduleQuery,
    MaintenanceScheduleSortField, NewAsset, NewMaintenanceRecord, NewMaintenanceSchedule,
    RecordStatus, Role, User, UserQuery, UserSortField,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<AssetCategory>,
    assets: Vec<Asset>,
    schedules: Vec<MaintenanceSchedule>,
    records: Vec<MaintenanceRecord>,
}

impl Tables {
    fn asset(&self, mut asset: Asset) -> Asset {
        if let Some(category) = self.categories.iter().find(|c| c.id == asset.category_id) {
            asset.category_name = category.name.clone();
        }
        asset
    }

    fn schedule(&self, mut schedule: MaintenanceSchedule) -> MaintenanceSchedule {
        if let Some(asset) = self.assets.iter().find(|a| a.id == schedule.asset_id) {
            schedule.asset_name = asset.name.clone();
        }
        schedule
    }

    fn record(&self, mut record: MaintenanceRecord) -> MaintenanceRecord {
        if let Some(asset) = self.assets.iter().find(|a| a.id == record.asset_id) {
            record.asset_name = asset.name.clone();
        }
        record.performed_by_name = record
            .performed_by
            .and_then(|id| self.users.iter().find(|u| u.id == id))
            .map(|u| u.name.clone());
        record
    }

    fn require_asset(&self, id: Uuid) -> DatabaseResult<()> {
        if self.assets.iter().any(|a| a.id == id) {
            Ok(())
        } else {
            Err(DatabaseError::ForeignKeyViolation("asset_id_fkey".to_string()))
        }
    }

    fn require_record_refs(
        &self,
        schedule_id: Option<Uuid>,
        performed_by: Option<Uuid>,
    ) -> DatabaseResult<()> {
        if let Some(id) = schedule_id {
            if !self.schedules.iter().any(|s| s.id == id) {
                return Err(DatabaseError::ForeignKeyViolation(
                    "maintenance_records_schedule_id_fkey".to_string(),
                ));
            }
        }
        if let Some(id) = performed_by {
            if !self.users.iter().any(|u| u.id == id) {
                return Err(DatabaseError::ForeignKeyViolation(
                    "maintenance_records_performed_by_fkey".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// NULLs sort after every value, as in PostgreSQL
fn nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

/// Orders rows by the sort column, then by id
fn sort_rows<T, S: SortColumn>(
    rows: &mut [T],
    sort: Sort<S>,
    compare: fn(&T, &T, S) -> Ordering,
    id: fn(&T) -> Uuid,
) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, sort.field).then_with(|| id(a).cmp(&id(b)));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_users(a: &User, b: &User, field: UserSortField) -> Ordering {
    match field {
        UserSortField::Id => a.id.cmp(&b.id),
        UserSortField::Name => a.name.cmp(&b.name),
        UserSortField::Email => a.email.cmp(&b.email),
        UserSortField::Role => a.role.cmp(&b.role),
        UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        UserSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn compare_categories(
    a: &AssetCategory,
    b: &AssetCategory,
    field: AssetCategorySortField,
) -> Ordering {
    match field {
        AssetCategorySortField::Id => a.id.cmp(&b.id),
        AssetCategorySortField::Name => a.name.cmp(&b.name),
        AssetCategorySortField::CreatedAt => a.created_at.cmp(&b.created_at),
        AssetCategorySortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn compare_assets(a: &Asset, b: &Asset, field: AssetSortField) -> Ordering {
    match field {
        AssetSortField::Id => a.id.cmp(&b.id),
        AssetSortField::Name => a.name.cmp(&b.name),
        AssetSortField::CategoryId => a.category_id.cmp(&b.category_id),
        AssetSortField::Location => nulls_last(&a.location, &b.location),
        AssetSortField::PurchaseDate => nulls_last(&a.purchase_date, &b.purchase_date),
        AssetSortField::LastMaintenanceDate => {
            nulls_last(&a.last_maintenance_date, &b.last_maintenance_date)
        }
        AssetSortField::Condition => nulls_last(&a.condition, &b.condition),
        AssetSortField::Status => a.status.cmp(&b.status),
        AssetSortField::AddedBy => nulls_last(&a.added_by, &b.added_by),
        AssetSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        AssetSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn compare_schedules(
    a: &MaintenanceSchedule,
    b: &MaintenanceSchedule,
    field: MaintenanceScheduleSortField,
) -> Ordering {
    match field {
        MaintenanceScheduleSortField::Id => a.id.cmp(&b.id),
        MaintenanceScheduleSortField::AssetId => a.asset_id.cmp(&b.asset_id),
        MaintenanceScheduleSortField::ScheduleType => a.schedule_type.cmp(&b.schedule_type),
        MaintenanceScheduleSortField::IntervalDays => nulls_last(&a.interval_days, &b.interval_days),
        MaintenanceScheduleSortField::NextMaintenanceDate => {
            a.next_maintenance_date.cmp(&b.next_maintenance_date)
        }
        MaintenanceScheduleSortField::ScheduledBy => nulls_last(&a.scheduled_by, &b.scheduled_by),
        MaintenanceScheduleSortField::AssignedTo => nulls_last(&a.assigned_to, &b.assigned_to),
        MaintenanceScheduleSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        MaintenanceScheduleSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn compare_records(
    a: &MaintenanceRecord,
    b: &MaintenanceRecord,
    field: MaintenanceRecordSortField,
) -> Ordering {
    match field {
        MaintenanceRecordSortField::Id => a.id.cmp(&b.id),
        MaintenanceRecordSortField::AssetId => a.asset_id.cmp(&b.asset_id),
        MaintenanceRecordSortField::ScheduleId => nulls_last(&a.schedule_id, &b.schedule_id),
        MaintenanceRecordSortField::PerformedBy => nulls_last(&a.performed_by, &b.performed_by),
        MaintenanceRecordSortField::Status => a.status.cmp(&b.status),
        MaintenanceRecordSortField::MaintenanceDate => a.maintenance_date.cmp(&b.maintenance_date),
        MaintenanceRecordSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        MaintenanceRecordSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let window = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    (window, total)
}

/// Shared in-memory tables; clones see the same data
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Store a user directly, bypassing the services
    pub fn insert_user(&self, user: User) {
        self.tables().users.push(user);
    }

    pub fn insert_category(&self, name: &str) -> AssetCategory {
        let now = Utc::now();
        let category = AssetCategory {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables().categories.push(category.clone());
        category
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> DatabaseResult<User> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }
        let now = Utc::now();
        let created = User {
            created_at: now,
            updated_at: now,
            ..user.clone()
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn exists_with_role(&self, role: Role) -> DatabaseResult<bool> {
        Ok(self.tables().users.iter().any(|u| u.role == role))
    }

    async fn list(&self, query: &UserQuery) -> DatabaseResult<(Vec<User>, i64)> {
        let mut users: Vec<User> = self
            .tables()
            .users
            .iter()
            .filter(|u| match &query.filter.search {
                Some(term) => contains_ci(&u.name, term) || contains_ci(&u.email, term),
                None => true,
            })
            .cloned()
            .collect();
        sort_rows(
            &mut users,
            query.sort(UserSortField::DEFAULT_SORT),
            compare_users,
            |u| u.id,
        );
        Ok(paginate(users, query.page))
    }

    async fn update(&self, user: &User) -> DatabaseResult<Option<User>> {
        let mut tables = self.tables();
        if tables
            .users
            .iter()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }
        let Some(stored) = tables.users.iter_mut().find(|u| u.id == user.id) else {
            return Ok(None);
        };
        *stored = User {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..user.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        for record in tables.records.iter_mut() {
            if record.performed_by == Some(id) {
                record.performed_by = None;
            }
        }
        Ok(tables.users.len() < before)
    }
}

#[async_trait]
impl AssetCategoryRepository for InMemoryStore {
    async fn create(&self, id: Uuid, name: &str) -> DatabaseResult<AssetCategory> {
        let now = Utc::now();
        let category = AssetCategory {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables().categories.push(category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<AssetCategory>> {
        Ok(self.tables().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list(
        &self,
        query: &AssetCategoryQuery,
    ) -> DatabaseResult<(Vec<AssetCategory>, i64)> {
        let mut categories: Vec<AssetCategory> = self
            .tables()
            .categories
            .iter()
            .filter(|c| match &query.filter.search {
                Some(term) => contains_ci(&c.name, term),
                None => true,
            })
            .cloned()
            .collect();
        sort_rows(
            &mut categories,
            query.sort(AssetCategorySortField::DEFAULT_SORT),
            compare_categories,
            |c| c.id,
        );
        Ok(paginate(categories, query.page))
    }

    async fn update(&self, category: &AssetCategory) -> DatabaseResult<Option<AssetCategory>> {
        let mut tables = self.tables();
        let Some(stored) = tables.categories.iter_mut().find(|c| c.id == category.id) else {
            return Ok(None);
        };
        stored.name = category.name.clone();
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables();
        if tables.assets.iter().any(|a| a.category_id == id) {
            return Err(DatabaseError::ForeignKeyViolation(
                "assets_category_id_fkey".to_string(),
            ));
        }
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        Ok(tables.categories.len() < before)
    }
}

#[async_trait]
impl AssetRepository for InMemoryStore {
    async fn create(&self, id: Uuid, asset: &NewAsset) -> DatabaseResult<Asset> {
        let mut tables = self.tables();
        if !tables.categories.iter().any(|c| c.id == asset.category_id) {
            return Err(DatabaseError::ForeignKeyViolation(
                "assets_category_id_fkey".to_string(),
            ));
        }
        let now = Utc::now();
        let created = Asset {
            id,
            name: asset.name.clone(),
            category_id: asset.category_id,
            category_name: String::new(),
            location: asset.location.clone(),
            purchase_date: asset.purchase_date,
            last_maintenance_date: asset.last_maintenance_date,
            condition: asset.condition.clone(),
            status: asset.status,
            added_by: asset.added_by,
            created_at: now,
            updated_at: now,
        };
        tables.assets.push(created.clone());
        Ok(tables.asset(created))
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Asset>> {
        let tables = self.tables();
        let asset = tables.assets.iter().find(|a| a.id == id).cloned();
        Ok(asset.map(|a| tables.asset(a)))
    }

    async fn list(&self, query: &AssetQuery) -> DatabaseResult<(Vec<Asset>, i64)> {
        let tables = self.tables();
        let filter = &query.filter;
        let mut assets: Vec<Asset> = tables
            .assets
            .iter()
            .filter(|a| match &filter.search {
                Some(term) => {
                    contains_ci(&a.name, term)
                        || a.location.as_deref().is_some_and(|l| contains_ci(l, term))
                        || a.condition.as_deref().is_some_and(|c| contains_ci(c, term))
                }
                None => true,
            })
            .filter(|a| filter.category_id.is_none_or(|id| a.category_id == id))
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .cloned()
            .map(|a| tables.asset(a))
            .collect();
        sort_rows(
            &mut assets,
            query.sort(AssetSortField::DEFAULT_SORT),
            compare_assets,
            |a| a.id,
        );
        Ok(paginate(assets, query.page))
    }

    async fn update(&self, asset: &Asset) -> DatabaseResult<Option<Asset>> {
        let mut tables = self.tables();
        if !tables.categories.iter().any(|c| c.id == asset.category_id) {
            return Err(DatabaseError::ForeignKeyViolation(
                "assets_category_id_fkey".to_string(),
            ));
        }
        let Some(stored) = tables.assets.iter_mut().find(|a| a.id == asset.id) else {
            return Ok(None);
        };
        *stored = Asset {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..asset.clone()
        };
        let updated = stored.clone();
        Ok(Some(tables.asset(updated)))
    }

    async fn update_status(&self, id: Uuid, status: AssetStatus) -> DatabaseResult<bool> {
        let mut tables = self.tables();
        match tables.assets.iter_mut().find(|a| a.id == id) {
            Some(asset) => {
                asset.status = status;
                asset.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables();
        let before = tables.assets.len();
        tables.assets.retain(|a| a.id != id);
        tables.schedules.retain(|s| s.asset_id != id);
        tables.records.retain(|r| r.asset_id != id);
        Ok(tables.assets.len() < before)
    }
}

#[async_trait]
impl MaintenanceScheduleRepository for InMemoryStore {
    async fn create(
        &self,
        id: Uuid,
        schedule: &NewMaintenanceSchedule,
    ) -> DatabaseResult<MaintenanceSchedule> {
        let mut tables = self.tables();
        tables.require_asset(schedule.asset_id)?;
        let now = Utc::now();
        let created = MaintenanceSchedule {
            id,
            asset_id: schedule.asset_id,
            asset_name: String::new(),
            schedule_type: schedule.schedule_type,
            interval_days: schedule.interval_days,
            next_maintenance_date: schedule.next_maintenance_date,
            scheduled_by: schedule.scheduled_by,
            assigned_to: schedule.assigned_to,
            created_at: now,
            updated_at: now,
        };
        tables.schedules.push(created.clone());
        Ok(tables.schedule(created))
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<MaintenanceSchedule>> {
        let tables = self.tables();
        let schedule = tables.schedules.iter().find(|s| s.id == id).cloned();
        Ok(schedule.map(|s| tables.schedule(s)))
    }

    async fn list(
        &self,
        query: &MaintenanceScheduleQuery,
    ) -> DatabaseResult<(Vec<MaintenanceSchedule>, i64)> {
        let tables = self.tables();
        let filter = &query.filter;
        let mut schedules: Vec<MaintenanceSchedule> = tables
            .schedules
            .iter()
            .filter(|s| filter.asset_id.is_none_or(|id| s.asset_id == id))
            .filter(|s| filter.schedule_type.is_none_or(|t| s.schedule_type == t))
            .filter(|s| filter.next_from.is_none_or(|from| s.next_maintenance_date >= from))
            .filter(|s| filter.next_to.is_none_or(|to| s.next_maintenance_date <= to))
            .cloned()
            .map(|s| tables.schedule(s))
            .collect();
        sort_rows(
            &mut schedules,
            query.sort(MaintenanceScheduleSortField::DEFAULT_SORT),
            compare_schedules,
            |s| s.id,
        );
        Ok(paginate(schedules, query.page))
    }

    async fn update(
        &self,
        schedule: &MaintenanceSchedule,
    ) -> DatabaseResult<Option<MaintenanceSchedule>> {
        let mut tables = self.tables();
        tables.require_asset(schedule.asset_id)?;
        let Some(stored) = tables.schedules.iter_mut().find(|s| s.id == schedule.id) else {
            return Ok(None);
        };
        *stored = MaintenanceSchedule {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..schedule.clone()
        };
        let updated = stored.clone();
        Ok(Some(tables.schedule(updated)))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables();
        let before = tables.schedules.len();
        tables.schedules.retain(|s| s.id != id);
        for record in tables.records.iter_mut() {
            if record.schedule_id == Some(id) {
                record.schedule_id = None;
            }
        }
        Ok(tables.schedules.len() < before)
    }
}

#[async_trait]
impl MaintenanceRecordRepository for InMemoryStore {
    async fn create(
        &self,
        id: Uuid,
        record: &NewMaintenanceRecord,
    ) -> DatabaseResult<MaintenanceRecord> {
        let mut tables = self.tables();
        tables.require_asset(record.asset_id)?;
        tables.require_record_refs(record.schedule_id, record.performed_by)?;
        let now = Utc::now();
        let created = MaintenanceRecord {
            id,
            asset_id: record.asset_id,
            asset_name: String::new(),
            schedule_id: record.schedule_id,
            performed_by: record.performed_by,
            performed_by_name: None,
            description: record.description.clone(),
            status: record.status,
            maintenance_date: record.maintenance_date,
            created_at: now,
            updated_at: now,
        };
        tables.records.push(created.clone());
        Ok(tables.record(created))
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<MaintenanceRecord>> {
        let tables = self.tables();
        let record = tables.records.iter().find(|r| r.id == id).cloned();
        Ok(record.map(|r| tables.record(r)))
    }

    async fn list(
        &self,
        query: &MaintenanceRecordQuery,
    ) -> DatabaseResult<(Vec<MaintenanceRecord>, i64)> {
        let tables = self.tables();
        let filter = &query.filter;
        let mut records: Vec<MaintenanceRecord> = tables
            .records
            .iter()
            .filter(|r| filter.asset_id.is_none_or(|id| r.asset_id == id))
            .filter(|r| {
                filter.schedule_ids.is_empty()
                    || r.schedule_id.is_some_and(|id| filter.schedule_ids.contains(&id))
            })
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .cloned()
            .map(|r| tables.record(r))
            .collect();
        sort_rows(
            &mut records,
            query.sort(MaintenanceRecordSortField::DEFAULT_SORT),
            compare_records,
            |r| r.id,
        );
        Ok(paginate(records, query.page))
    }

    async fn update(
        &self,
        record: &MaintenanceRecord,
    ) -> DatabaseResult<Option<MaintenanceRecord>> {
        let mut tables = self.tables();
        tables.require_asset(record.asset_id)?;
        tables.require_record_refs(record.schedule_id, record.performed_by)?;
        let Some(stored) = tables.records.iter_mut().find(|r| r.id == record.id) else {
            return Ok(None);
        };
        *stored = MaintenanceRecord {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..record.clone()
        };
        let updated = stored.clone();
        Ok(Some(tables.record(updated)))
    }

    async fn update_status(&self, id: Uuid, status: RecordStatus) -> DatabaseResult<bool> {
        let mut tables = self.tables();
        match tables.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = status;
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables();
        let before = tables.records.len();
        tables.records.retain(|r| r.id != id);
        Ok(tables.records.len() < before)
    }
}
