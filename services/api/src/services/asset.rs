//! Asset service

use std::sync::Arc;

use common::pagination::Page;
use tracing::info;
use uuid::Uuid;

use super::{Entity, ServiceError, ServiceResult};
use crate::models::{Asset, AssetPatch, AssetQuery, AssetStatus, NewAsset};
use crate::repositories::{AssetCategoryRepository, AssetRepository};

#[derive(Clone)]
pub struct AssetService {
    assets: Arc<dyn AssetRepository>,
    categories: Arc<dyn AssetCategoryRepository>,
}

impl AssetService {
    pub fn new(
        assets: Arc<dyn AssetRepository>,
        categories: Arc<dyn AssetCategoryRepository>,
    ) -> Self {
        Self { assets, categories }
    }

    pub async fn create(&self, asset: NewAsset) -> ServiceResult<Asset> {
        self.require_category(asset.category_id).await?;

        let id = asset.id.unwrap_or_else(Uuid::new_v4);
        let created = self.assets.create(id, &asset).await?;
        info!("Asset {} created", created.id);
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Asset> {
        self.assets
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(Entity::Asset))
    }

    pub async fn list(&self, query: &AssetQuery) -> ServiceResult<Page<Asset>> {
        let (assets, total) = self.assets.list(query).await?;
        Ok(Page::new(assets, total, query.page))
    }

    pub async fn update(&self, id: Uuid, patch: AssetPatch) -> ServiceResult<Asset> {
        let mut asset = self.get(id).await?;
        if let Some(category_id) = patch.category_id {
            self.require_category(category_id).await?;
        }
        patch.apply(&mut asset);

        self.assets
            .update(&asset)
            .await?
            .ok_or(ServiceError::NotFound(Entity::Asset))
    }

    /// Change only the status column of an existing asset
    pub async fn update_status(&self, id: Uuid, status: AssetStatus) -> ServiceResult<Asset> {
        self.get(id).await?;
        if !self.assets.update_status(id, status).await? {
            return Err(ServiceError::NotFound(Entity::Asset));
        }
        info!("Asset {} status set to {:?}", id, status);
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        self.get(id).await?;
        if !self.assets.delete(id).await? {
            return Err(ServiceError::NotFound(Entity::Asset));
        }
        info!("Asset {} deleted", id);
        Ok(())
    }

    async fn require_category(&self, id: Uuid) -> ServiceResult<()> {
        match self.categories.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(Entity::Category)),
        }
    }
}
