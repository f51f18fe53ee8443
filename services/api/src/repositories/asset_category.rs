//! Asset category repository

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::{Conditions, like_pattern};
use crate::models::{
    AssetCategory, AssetCategoryFilter, AssetCategoryQuery, AssetCategorySortField,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetCategoryRepository: Send + Sync {
    async fn create(&self, id: Uuid, name: &str) -> DatabaseResult<AssetCategory>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<AssetCategory>>;

    async fn list(&self, query: &AssetCategoryQuery)
    -> DatabaseResult<(Vec<AssetCategory>, i64)>;

    async fn update(&self, category: &AssetCategory) -> DatabaseResult<Option<AssetCategory>>;

    /// Fails with a foreign key violation while assets still reference it
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

#[derive(Clone)]
pub struct PgAssetCategoryRepository {
    pool: PgPool,
}

impl PgAssetCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &AssetCategoryFilter) {
    let mut conditions = Conditions::new();
    if let Some(search) = &filter.search {
        conditions.push(builder);
        builder.push("name ILIKE ").push_bind(like_pattern(search));
    }
}

fn count_query(filter: &AssetCategoryFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM asset_categories");
    push_filter(&mut builder, filter);
    builder
}

fn select_query(query: &AssetCategoryQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::new("SELECT id, name, created_at, updated_at FROM asset_categories");
    push_filter(&mut builder, &query.filter);
    builder
        .push(" ORDER BY ")
        .push(query.order_by(AssetCategorySortField::DEFAULT_SORT))
        .push(" LIMIT ")
        .push_bind(query.page.limit())
        .push(" OFFSET ")
        .push_bind(query.page.offset());
    builder
}

#[async_trait]
impl AssetCategoryRepository for PgAssetCategoryRepository {
    async fn create(&self, id: Uuid, name: &str) -> DatabaseResult<AssetCategory> {
        info!("Creating asset category: {}", name);

        let category = sqlx::query_as::<_, AssetCategory>(
            r#"
            INSERT INTO asset_categories (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<AssetCategory>> {
        info!("Finding asset category by ID: {}", id);

        let category = sqlx::query_as::<_, AssetCategory>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM asset_categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn list(
        &self,
        query: &AssetCategoryQuery,
    ) -> DatabaseResult<(Vec<AssetCategory>, i64)> {
        debug!("Listing asset categories: {:?}", query);

        let mut count = count_query(&query.filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = select_query(query);
        let categories = select
            .build_query_as::<AssetCategory>()
            .fetch_all(&self.pool)
            .await?;

        Ok((categories, total))
    }

    async fn update(&self, category: &AssetCategory) -> DatabaseResult<Option<AssetCategory>> {
        info!("Updating asset category: {}", category.id);

        let updated = sqlx::query_as::<_, AssetCategory>(
            r#"
            UPDATE asset_categories
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting asset category: {}", id);

        let result = sqlx::query("DELETE FROM asset_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
