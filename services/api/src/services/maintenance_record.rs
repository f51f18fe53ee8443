//! Maintenance record service

use std::sync::Arc;

use common::pagination::Page;
use tracing::info;
use uuid::Uuid;

use super::{Entity, ServiceError, ServiceResult};
use crate::models::{
    MaintenanceRecord, MaintenanceRecordPatch, MaintenanceRecordQuery, NewMaintenanceRecord,
    RecordStatus,
};
use crate::repositories::{
    AssetRepository, MaintenanceRecordRepository, MaintenanceScheduleRepository, UserRepository,
};

#[derive(Clone)]
pub struct MaintenanceRecordService {
    records: Arc<dyn MaintenanceRecordRepository>,
    assets: Arc<dyn AssetRepository>,
    schedules: Arc<dyn MaintenanceScheduleRepository>,
    users: Arc<dyn UserRepository>,
}

impl MaintenanceRecordService {
    pub fn new(
        records: Arc<dyn MaintenanceRecordRepository>,
        assets: Arc<dyn AssetRepository>,
        schedules: Arc<dyn MaintenanceScheduleRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            records,
            assets,
            schedules,
            users,
        }
    }

    pub async fn create(&self, record: NewMaintenanceRecord) -> ServiceResult<MaintenanceRecord> {
        self.require_references(Some(record.asset_id), record.schedule_id, record.performed_by)
            .await?;

        let id = record.id.unwrap_or_else(Uuid::new_v4);
        let created = self.records.create(id, &record).await?;
        info!("Maintenance record {} created", created.id);
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<MaintenanceRecord> {
        self.records
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(Entity::MaintenanceRecord))
    }

    pub async fn list(
        &self,
        query: &MaintenanceRecordQuery,
    ) -> ServiceResult<Page<MaintenanceRecord>> {
        let (records, total) = self.records.list(query).await?;
        Ok(Page::new(records, total, query.page))
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: MaintenanceRecordPatch,
    ) -> ServiceResult<MaintenanceRecord> {
        let mut record = self.get(id).await?;
        self.require_references(
            patch.asset_id,
            patch.referenced_schedule(),
            patch.referenced_performer(),
        )
        .await?;
        patch.apply(&mut record);

        self.records
            .update(&record)
            .await?
            .ok_or(ServiceError::NotFound(Entity::MaintenanceRecord))
    }

    /// Change only the status column of an existing record
    pub async fn update_status(
        &self,
        id: Uuid,
        status: RecordStatus,
    ) -> ServiceResult<MaintenanceRecord> {
        self.get(id).await?;
        if !self.records.update_status(id, status).await? {
            return Err(ServiceError::NotFound(Entity::MaintenanceRecord));
        }
        info!("Maintenance record {} status set to {:?}", id, status);
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        self.get(id).await?;
        if !self.records.delete(id).await? {
            return Err(ServiceError::NotFound(Entity::MaintenanceRecord));
        }
        info!("Maintenance record {} deleted", id);
        Ok(())
    }

    /// Check that every supplied reference resolves, asset first
    async fn require_references(
        &self,
        asset_id: Option<Uuid>,
        schedule_id: Option<Uuid>,
        performed_by: Option<Uuid>,
    ) -> ServiceResult<()> {
        if let Some(id) = asset_id {
            if self.assets.find_by_id(id).await?.is_none() {
                return Err(ServiceError::NotFound(Entity::Asset));
            }
        }
        if let Some(id) = schedule_id {
            if self.schedules.find_by_id(id).await?.is_none() {
                return Err(ServiceError::NotFound(Entity::MaintenanceSchedule));
            }
        }
        if let Some(id) = performed_by {
            if self.users.find_by_id(id).await?.is_none() {
                return Err(ServiceError::NotFound(Entity::Performer));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use common::pagination::SortDirection;

    use crate::models::{
        Asset, AssetStatus, MaintenanceRecordFilter, MaintenanceSchedule, NewAsset,
        NewMaintenanceSchedule, Role, ScheduleType, User,
    };
    use crate::repositories::maintenance_record::MockMaintenanceRecordRepository;
    use crate::repositories::memory::InMemoryStore;

    fn service(store: &InMemoryStore) -> MaintenanceRecordService {
        MaintenanceRecordService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
    }

    struct Fixture {
        store: InMemoryStore,
        asset: Asset,
        schedule: MaintenanceSchedule,
        technician: User,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let category = store.insert_category("Boilers");
        let asset = AssetRepository::create(
            &store,
            Uuid::new_v4(),
            &NewAsset {
                id: None,
                name: "Boiler 2".to_string(),
                category_id: category.id,
                location: None,
                purchase_date: None,
                last_maintenance_date: None,
                condition: None,
                status: AssetStatus::Ready,
                added_by: None,
            },
        )
        .await
        .unwrap();
        let schedule = MaintenanceScheduleRepository::create(
            &store,
            Uuid::new_v4(),
            &NewMaintenanceSchedule {
                id: None,
                asset_id: asset.id,
                schedule_type: ScheduleType::Conditional,
                interval_days: None,
                next_maintenance_date: Utc::now(),
                scheduled_by: None,
                assigned_to: None,
            },
        )
        .await
        .unwrap();
        let now = Utc::now();
        let technician = User {
            id: Uuid::new_v4(),
            name: "Tess Tech".to_string(),
            email: "tess@example.com".to_string(),
            password_hash: "plain$pw".to_string(),
            role: Role::Technician,
            created_at: now,
            updated_at: now,
        };
        store.insert_user(technician.clone());

        Fixture {
            store,
            asset,
            schedule,
            technician,
        }
    }

    fn new_record(asset_id: Uuid) -> NewMaintenanceRecord {
        NewMaintenanceRecord {
            id: None,
            asset_id,
            schedule_id: None,
            performed_by: None,
            description: "Replaced pressure valve".to_string(),
            status: RecordStatus::Pending,
            maintenance_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_without_optional_references() {
        let fx = fixture().await;
        let service = service(&fx.store);

        let created = service.create(new_record(fx.asset.id)).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.asset_name, "Boiler 2");
        assert_eq!(fetched.schedule_id, None);
        assert_eq!(fetched.performed_by_name, None);
    }

    #[tokio::test]
    async fn test_create_reports_each_missing_reference() {
        let fx = fixture().await;
        let service = service(&fx.store);

        let missing_asset = service.create(new_record(Uuid::new_v4())).await;
        assert!(matches!(missing_asset, Err(ServiceError::NotFound(Entity::Asset))));

        let mut input = new_record(fx.asset.id);
        input.schedule_id = Some(Uuid::new_v4());
        let missing_schedule = service.create(input).await;
        assert!(matches!(
            missing_schedule,
            Err(ServiceError::NotFound(Entity::MaintenanceSchedule))
        ));

        let mut input = new_record(fx.asset.id);
        input.performed_by = Some(Uuid::new_v4());
        let missing_performer = service.create(input).await;
        assert!(matches!(
            missing_performer,
            Err(ServiceError::NotFound(Entity::Performer))
        ));
    }

    #[tokio::test]
    async fn test_create_with_all_references() {
        let fx = fixture().await;
        let mut input = new_record(fx.asset.id);
        input.schedule_id = Some(fx.schedule.id);
        input.performed_by = Some(fx.technician.id);

        let created = service(&fx.store).create(input).await.unwrap();

        assert_eq!(created.schedule_id, Some(fx.schedule.id));
        assert_eq!(created.performed_by_name.as_deref(), Some("Tess Tech"));
    }

    #[tokio::test]
    async fn test_update_can_clear_schedule() {
        let fx = fixture().await;
        let service = service(&fx.store);
        let mut input = new_record(fx.asset.id);
        input.schedule_id = Some(fx.schedule.id);
        input.performed_by = Some(fx.technician.id);
        let created = service.create(input).await.unwrap();

        let patch = MaintenanceRecordPatch {
            schedule_id: Some(None),
            description: Some("Valve replaced and tested".to_string()),
            ..Default::default()
        };
        let updated = service.update(created.id, patch).await.unwrap();

        assert_eq!(updated.schedule_id, None);
        assert_eq!(updated.performed_by, Some(fx.technician.id));
        assert_eq!(updated.description, "Valve replaced and tested");
    }

    #[tokio::test]
    async fn test_update_revalidates_performer() {
        let fx = fixture().await;
        let service = service(&fx.store);
        let created = service.create(new_record(fx.asset.id)).await.unwrap();

        let patch = MaintenanceRecordPatch {
            performed_by: Some(Some(Uuid::new_v4())),
            ..Default::default()
        };
        let result = service.update(created.id, patch).await;

        assert!(matches!(result, Err(ServiceError::NotFound(Entity::Performer))));
    }

    #[tokio::test]
    async fn test_update_status() {
        let fx = fixture().await;
        let service = service(&fx.store);
        let created = service.create(new_record(fx.asset.id)).await.unwrap();

        let updated = service
            .update_status(created.id, RecordStatus::Finished)
            .await
            .unwrap();

        assert_eq!(updated.status, RecordStatus::Finished);
        assert_eq!(updated.description, created.description);
    }

    #[tokio::test]
    async fn test_update_status_of_missing_record_never_writes() {
        let mut records = MockMaintenanceRecordRepository::new();
        records.expect_find_by_id().returning(|_| Ok(None));
        records.expect_update_status().times(0);
        records.expect_update().times(0);
        let store = InMemoryStore::new();
        let service = MaintenanceRecordService::new(
            Arc::new(records),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
        );

        let result = service
            .update_status(Uuid::new_v4(), RecordStatus::Canceled)
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::NotFound(Entity::MaintenanceRecord))
        ));
    }

    #[tokio::test]
    async fn test_list_orders_by_maintenance_date() {
        let fx = fixture().await;
        let service = service(&fx.store);
        let now = Utc::now();
        let mut ids = Vec::new();
        for days_ago in [3, 1, 2] {
            let mut input = new_record(fx.asset.id);
            input.maintenance_date = now - Duration::days(days_ago);
            ids.push(service.create(input).await.unwrap().id);
        }
        let (three_days, one_day, two_days) = (ids[0], ids[1], ids[2]);

        let latest_first = service
            .list(&MaintenanceRecordQuery::default())
            .await
            .unwrap();
        let order: Vec<Uuid> = latest_first.items.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![one_day, two_days, three_days]);

        let oldest_first = MaintenanceRecordQuery {
            sort_dir: Some(SortDirection::Asc),
            ..Default::default()
        };
        let order: Vec<Uuid> = service
            .list(&oldest_first)
            .await
            .unwrap()
            .items
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(order, vec![three_days, two_days, one_day]);
    }

    #[tokio::test]
    async fn test_list_filters_by_schedule_ids() {
        let fx = fixture().await;
        let service = service(&fx.store);
        let mut scheduled = new_record(fx.asset.id);
        scheduled.schedule_id = Some(fx.schedule.id);
        service.create(scheduled).await.unwrap();
        service.create(new_record(fx.asset.id)).await.unwrap();

        let query = MaintenanceRecordQuery {
            filter: MaintenanceRecordFilter {
                schedule_ids: vec![fx.schedule.id, Uuid::new_v4()],
                ..Default::default()
            },
            ..Default::default()
        };
        let page = service.list(&query).await.unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].schedule_id, Some(fx.schedule.id));
    }
}
