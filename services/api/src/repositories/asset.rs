//! Asset repository
//!
//! Every read joins `asset_categories` so the returned asset carries the
//! category's current name. Writes go through a CTE and join on the way out
//! for the same reason.

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::{Conditions, like_pattern};
use crate::models::{Asset, AssetFilter, AssetQuery, AssetSortField, AssetStatus, NewAsset};

const ASSET_SELECT: &str = "SELECT a.id, a.name, a.category_id, c.name AS category_name, \
     a.location, a.purchase_date, a.last_maintenance_date, a.condition, a.status, \
     a.added_by, a.created_at, a.updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn create(&self, id: Uuid, asset: &NewAsset) -> DatabaseResult<Asset>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Asset>>;

    async fn list(&self, query: &AssetQuery) -> DatabaseResult<(Vec<Asset>, i64)>;

    async fn update(&self, asset: &Asset) -> DatabaseResult<Option<Asset>>;

    /// Write only the status column; `false` when the row is gone
    async fn update_status(&self, id: Uuid, status: AssetStatus) -> DatabaseResult<bool>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

#[derive(Clone)]
pub struct PgAssetRepository {
    pool: PgPool,
}

impl PgAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &AssetFilter) {
    let mut conditions = Conditions::new();
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        conditions.push(builder);
        builder
            .push("(a.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.location ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.condition ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category_id) = filter.category_id {
        conditions.push(builder);
        builder.push("a.category_id = ").push_bind(category_id);
    }
    if let Some(status) = filter.status {
        conditions.push(builder);
        builder.push("a.status = ").push_bind(status);
    }
}

fn count_query(filter: &AssetFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM assets a");
    push_filter(&mut builder, filter);
    builder
}

fn select_query(query: &AssetQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "{ASSET_SELECT} FROM assets a JOIN asset_categories c ON c.id = a.category_id"
    ));
    push_filter(&mut builder, &query.filter);
    builder
        .push(" ORDER BY ")
        .push(query.order_by(AssetSortField::DEFAULT_SORT))
        .push(" LIMIT ")
        .push_bind(query.page.limit())
        .push(" OFFSET ")
        .push_bind(query.page.offset());
    builder
}

#[async_trait]
impl AssetRepository for PgAssetRepository {
    async fn create(&self, id: Uuid, asset: &NewAsset) -> DatabaseResult<Asset> {
        info!("Creating asset: {}", asset.name);

        let created = sqlx::query_as::<_, Asset>(&format!(
            "WITH a AS ( \
                INSERT INTO assets (id, name, category_id, location, purchase_date, \
                    last_maintenance_date, condition, status, added_by) \
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING * \
             ) {ASSET_SELECT} FROM a JOIN asset_categories c ON c.id = a.category_id"
        ))
        .bind(id)
        .bind(&asset.name)
        .bind(asset.category_id)
        .bind(&asset.location)
        .bind(asset.purchase_date)
        .bind(asset.last_maintenance_date)
        .bind(&asset.condition)
        .bind(asset.status)
        .bind(asset.added_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Asset>> {
        info!("Finding asset by ID: {}", id);

        let asset = sqlx::query_as::<_, Asset>(&format!(
            "{ASSET_SELECT} FROM assets a JOIN asset_categories c ON c.id = a.category_id \
             WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }

    async fn list(&self, query: &AssetQuery) -> DatabaseResult<(Vec<Asset>, i64)> {
        debug!("Listing assets: {:?}", query);

        let mut count = count_query(&query.filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = select_query(query);
        let assets = select.build_query_as::<Asset>().fetch_all(&self.pool).await?;

        Ok((assets, total))
    }

    async fn update(&self, asset: &Asset) -> DatabaseResult<Option<Asset>> {
        info!("Updating asset: {}", asset.id);

        let updated = sqlx::query_as::<_, Asset>(&format!(
            "WITH a AS ( \
                UPDATE assets SET name = $2, category_id = $3, location = $4, \
                    purchase_date = $5, last_maintenance_date = $6, condition = $7, \
                    status = $8, added_by = $9, updated_at = NOW() \
                WHERE id = $1 RETURNING * \
             ) {ASSET_SELECT} FROM a JOIN asset_categories c ON c.id = a.category_id"
        ))
        .bind(asset.id)
        .bind(&asset.name)
        .bind(asset.category_id)
        .bind(&asset.location)
        .bind(asset.purchase_date)
        .bind(asset.last_maintenance_date)
        .bind(&asset.condition)
        .bind(asset.status)
        .bind(asset.added_by)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn update_status(&self, id: Uuid, status: AssetStatus) -> DatabaseResult<bool> {
        info!("Updating asset {} status to {:?}", id, status);

        let result =
            sqlx::query("UPDATE assets SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting asset: {}", id);

        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
