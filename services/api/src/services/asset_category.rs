//! Asset category service

use std::sync::Arc;

use common::pagination::Page;
use tracing::info;
use uuid::Uuid;

use super::{Entity, ServiceError, ServiceResult};
use crate::models::{AssetCategory, AssetCategoryPatch, AssetCategoryQuery, NewAssetCategory};
use crate::repositories::AssetCategoryRepository;

#[derive(Clone)]
pub struct AssetCategoryService {
    categories: Arc<dyn AssetCategoryRepository>,
}

impl AssetCategoryService {
    pub fn new(categories: Arc<dyn AssetCategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn create(&self, category: NewAssetCategory) -> ServiceResult<AssetCategory> {
        let id = category.id.unwrap_or_else(Uuid::new_v4);
        let created = self.categories.create(id, &category.name).await?;
        info!("Asset category {} created", created.id);
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<AssetCategory> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(Entity::Category))
    }

    pub async fn list(&self, query: &AssetCategoryQuery) -> ServiceResult<Page<AssetCategory>> {
        let (categories, total) = self.categories.list(query).await?;
        Ok(Page::new(categories, total, query.page))
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: AssetCategoryPatch,
    ) -> ServiceResult<AssetCategory> {
        let mut category = self.get(id).await?;
        if let Some(name) = patch.name {
            category.name = name;
        }

        self.categories
            .update(&category)
            .await?
            .ok_or(ServiceError::NotFound(Entity::Category))
    }

    /// Fails with `Conflict` while assets still reference the category
    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        self.get(id).await?;
        if !self.categories.delete(id).await? {
            return Err(ServiceError::NotFound(Entity::Category));
        }
        info!("Asset category {} deleted", id);
        Ok(())
    }
}
