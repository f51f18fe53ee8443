//! Maintenance schedule service

use std::sync::Arc;

use common::pagination::Page;
use tracing::info;
use uuid::Uuid;

use super::{Entity, ServiceError, ServiceResult};
use crate::models::{
    MaintenanceSchedule, MaintenanceSchedulePatch, MaintenanceScheduleQuery,
    NewMaintenanceSchedule,
};
use crate::repositories::{AssetRepository, MaintenanceScheduleRepository};

#[derive(Clone)]
pub struct MaintenanceScheduleService {
    schedules: Arc<dyn MaintenanceScheduleRepository>,
    assets: Arc<dyn AssetRepository>,
}

impl MaintenanceScheduleService {
    pub fn new(
        schedules: Arc<dyn MaintenanceScheduleRepository>,
        assets: Arc<dyn AssetRepository>,
    ) -> Self {
        Self { schedules, assets }
    }

    pub async fn create(
        &self,
        schedule: NewMaintenanceSchedule,
    ) -> ServiceResult<MaintenanceSchedule> {
        self.require_asset(schedule.asset_id).await?;

        let id = schedule.id.unwrap_or_else(Uuid::new_v4);
        let created = self.schedules.create(id, &schedule).await?;
        info!("Maintenance schedule {} created", created.id);
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<MaintenanceSchedule> {
        self.schedules
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(Entity::MaintenanceSchedule))
    }

    pub async fn list(
        &self,
        query: &MaintenanceScheduleQuery,
    ) -> ServiceResult<Page<MaintenanceSchedule>> {
        let (schedules, total) = self.schedules.list(query).await?;
        Ok(Page::new(schedules, total, query.page))
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: MaintenanceSchedulePatch,
    ) -> ServiceResult<MaintenanceSchedule> {
        let mut schedule = self.get(id).await?;
        if let Some(asset_id) = patch.asset_id {
            self.require_asset(asset_id).await?;
        }
        patch.apply(&mut schedule);

        self.schedules
            .update(&schedule)
            .await?
            .ok_or(ServiceError::NotFound(Entity::MaintenanceSchedule))
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        self.get(id).await?;
        if !self.schedules.delete(id).await? {
            return Err(ServiceError::NotFound(Entity::MaintenanceSchedule));
        }
        info!("Maintenance schedule {} deleted", id);
        Ok(())
    }

    async fn require_asset(&self, id: Uuid) -> ServiceResult<()> {
        match self.assets.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(Entity::Asset)),
        }
    }
}
