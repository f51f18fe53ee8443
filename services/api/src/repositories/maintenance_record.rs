//! Maintenance record repository

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::Conditions;
use crate::models::{
    MaintenanceRecord, MaintenanceRecordFilter, MaintenanceRecordQuery,
    MaintenanceRecordSortField, NewMaintenanceRecord, RecordStatus,
};

const RECORD_SELECT: &str = "SELECT r.id, r.asset_id, a.name AS asset_name, r.schedule_id, \
     r.performed_by, u.name AS performed_by_name, r.description, r.status, \
     r.maintenance_date, r.created_at, r.updated_at";

const RECORD_JOINS: &str =
    "JOIN assets a ON a.id = r.asset_id LEFT JOIN users u ON u.id = r.performed_by";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceRecordRepository: Send + Sync {
    async fn create(
        &self,
        id: Uuid,
        record: &NewMaintenanceRecord,
    ) -> DatabaseResult<MaintenanceRecord>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<MaintenanceRecord>>;

    async fn list(
        &self,
        query: &MaintenanceRecordQuery,
    ) -> DatabaseResult<(Vec<MaintenanceRecord>, i64)>;

    async fn update(&self, record: &MaintenanceRecord)
    -> DatabaseResult<Option<MaintenanceRecord>>;

    /// Write only the status column; `false` when the row is gone
    async fn update_status(&self, id: Uuid, status: RecordStatus) -> DatabaseResult<bool>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

#[derive(Clone)]
pub struct PgMaintenanceRecordRepository {
    pool: PgPool,
}

impl PgMaintenanceRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &MaintenanceRecordFilter) {
    let mut conditions = Conditions::new();
    if let Some(asset_id) = filter.asset_id {
        conditions.push(builder);
        builder.push("r.asset_id = ").push_bind(asset_id);
    }
    if !filter.schedule_ids.is_empty() {
        conditions.push(builder);
        builder
            .push("r.schedule_id = ANY(")
            .push_bind(filter.schedule_ids.clone())
            .push(")");
    }
    if let Some(status) = filter.status {
        conditions.push(builder);
        builder.push("r.status = ").push_bind(status);
    }
}

fn count_query(filter: &MaintenanceRecordFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM maintenance_records r");
    push_filter(&mut builder, filter);
    builder
}

fn select_query(query: &MaintenanceRecordQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::new(format!("{RECORD_SELECT} FROM maintenance_records r {RECORD_JOINS}"));
    push_filter(&mut builder, &query.filter);
    builder
        .push(" ORDER BY ")
        .push(query.order_by(MaintenanceRecordSortField::DEFAULT_SORT))
        .push(" LIMIT ")
        .push_bind(query.page.limit())
        .push(" OFFSET ")
        .push_bind(query.page.offset());
    builder
}

#[async_trait]
impl MaintenanceRecordRepository for PgMaintenanceRecordRepository {
    async fn create(
        &self,
        id: Uuid,
        record: &NewMaintenanceRecord,
    ) -> DatabaseResult<MaintenanceRecord> {
        info!("Creating maintenance record for asset: {}", record.asset_id);

        let created = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            "WITH r AS ( \
                INSERT INTO maintenance_records (id, asset_id, schedule_id, performed_by, \
                    description, status, maintenance_date) \
                VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING * \
             ) {RECORD_SELECT} FROM r {RECORD_JOINS}"
        ))
        .bind(id)
        .bind(record.asset_id)
        .bind(record.schedule_id)
        .bind(record.performed_by)
        .bind(&record.description)
        .bind(record.status)
        .bind(record.maintenance_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<MaintenanceRecord>> {
        info!("Finding maintenance record by ID: {}", id);

        let record = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            "{RECORD_SELECT} FROM maintenance_records r {RECORD_JOINS} WHERE r.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(
        &self,
        query: &MaintenanceRecordQuery,
    ) -> DatabaseResult<(Vec<MaintenanceRecord>, i64)> {
        debug!("Listing maintenance records: {:?}", query);

        let mut count = count_query(&query.filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = select_query(query);
        let records = select
            .build_query_as::<MaintenanceRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok((records, total))
    }

    async fn update(
        &self,
        record: &MaintenanceRecord,
    ) -> DatabaseResult<Option<MaintenanceRecord>> {
        info!("Updating maintenance record: {}", record.id);

        let updated = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            "WITH r AS ( \
                UPDATE maintenance_records SET asset_id = $2, schedule_id = $3, \
                    performed_by = $4, description = $5, status = $6, \
                    maintenance_date = $7, updated_at = NOW() \
                WHERE id = $1 RETURNING * \
             ) {RECORD_SELECT} FROM r {RECORD_JOINS}"
        ))
        .bind(record.id)
        .bind(record.asset_id)
        .bind(record.schedule_id)
        .bind(record.performed_by)
        .bind(&record.description)
        .bind(record.status)
        .bind(record.maintenance_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn update_status(&self, id: Uuid, status: RecordStatus) -> DatabaseResult<bool> {
        info!("Updating maintenance record {} status to {:?}", id, status);

        let result = sqlx::query(
            "UPDATE maintenance_records SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting maintenance record: {}", id);

        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
