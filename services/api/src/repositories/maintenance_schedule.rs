//! Maintenance schedule repository

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::Conditions;
use crate::models::{
    MaintenanceSchedule, MaintenanceScheduleFilter, MaintenanceScheduleQuery,
    MaintenanceScheduleSortField, NewMaintenanceSchedule,
};

const SCHEDULE_SELECT: &str = "SELECT s.id, s.asset_id, a.name AS asset_name, s.schedule_type, \
     s.interval_days, s.next_maintenance_date, s.scheduled_by, s.assigned_to, \
     s.created_at, s.updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceScheduleRepository: Send + Sync {
    async fn create(
        &self,
        id: Uuid,
        schedule: &NewMaintenanceSchedule,
    ) -> DatabaseResult<MaintenanceSchedule>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<MaintenanceSchedule>>;

    async fn list(
        &self,
        query: &MaintenanceScheduleQuery,
    ) -> DatabaseResult<(Vec<MaintenanceSchedule>, i64)>;

    async fn update(
        &self,
        schedule: &MaintenanceSchedule,
    ) -> DatabaseResult<Option<MaintenanceSchedule>>;

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

#[derive(Clone)]
pub struct PgMaintenanceScheduleRepository {
    pool: PgPool,
}

impl PgMaintenanceScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &MaintenanceScheduleFilter) {
    let mut conditions = Conditions::new();
    if let Some(asset_id) = filter.asset_id {
        conditions.push(builder);
        builder.push("s.asset_id = ").push_bind(asset_id);
    }
    if let Some(schedule_type) = filter.schedule_type {
        conditions.push(builder);
        builder.push("s.schedule_type = ").push_bind(schedule_type);
    }
    if let Some(from) = filter.next_from {
        conditions.push(builder);
        builder.push("s.next_maintenance_date >= ").push_bind(from);
    }
    if let Some(to) = filter.next_to {
        conditions.push(builder);
        builder.push("s.next_maintenance_date <= ").push_bind(to);
    }
}

fn count_query(filter: &MaintenanceScheduleFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM maintenance_schedules s");
    push_filter(&mut builder, filter);
    builder
}

fn select_query(query: &MaintenanceScheduleQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "{SCHEDULE_SELECT} FROM maintenance_schedules s JOIN assets a ON a.id = s.asset_id"
    ));
    push_filter(&mut builder, &query.filter);
    builder
        .push(" ORDER BY ")
        .push(query.order_by(MaintenanceScheduleSortField::DEFAULT_SORT))
        .push(" LIMIT ")
        .push_bind(query.page.limit())
        .push(" OFFSET ")
        .push_bind(query.page.offset());
    builder
}

#[async_trait]
impl MaintenanceScheduleRepository for PgMaintenanceScheduleRepository {
    async fn create(
        &self,
        id: Uuid,
        schedule: &NewMaintenanceSchedule,
    ) -> DatabaseResult<MaintenanceSchedule> {
        info!("Creating maintenance schedule for asset: {}", schedule.asset_id);

        let created = sqlx::query_as::<_, MaintenanceSchedule>(&format!(
            "WITH s AS ( \
                INSERT INTO maintenance_schedules (id, asset_id, schedule_type, interval_days, \
                    next_maintenance_date, scheduled_by, assigned_to) \
                VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING * \
             ) {SCHEDULE_SELECT} FROM s JOIN assets a ON a.id = s.asset_id"
        ))
        .bind(id)
        .bind(schedule.asset_id)
        .bind(schedule.schedule_type)
        .bind(schedule.interval_days)
        .bind(schedule.next_maintenance_date)
        .bind(schedule.scheduled_by)
        .bind(schedule.assigned_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<MaintenanceSchedule>> {
        info!("Finding maintenance schedule by ID: {}", id);

        let schedule = sqlx::query_as::<_, MaintenanceSchedule>(&format!(
            "{SCHEDULE_SELECT} FROM maintenance_schedules s JOIN assets a ON a.id = s.asset_id \
             WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }

    async fn list(
        &self,
        query: &MaintenanceScheduleQuery,
    ) -> DatabaseResult<(Vec<MaintenanceSchedule>, i64)> {
        debug!("Listing maintenance schedules: {:?}", query);

        let mut count = count_query(&query.filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = select_query(query);
        let schedules = select
            .build_query_as::<MaintenanceSchedule>()
            .fetch_all(&self.pool)
            .await?;

        Ok((schedules, total))
    }

    async fn update(
        &self,
        schedule: &MaintenanceSchedule,
    ) -> DatabaseResult<Option<MaintenanceSchedule>> {
        info!("Updating maintenance schedule: {}", schedule.id);

        let updated = sqlx::query_as::<_, MaintenanceSchedule>(&format!(
            "WITH s AS ( \
                UPDATE maintenance_schedules SET asset_id = $2, schedule_type = $3, \
                    interval_days = $4, next_maintenance_date = $5, scheduled_by = $6, \
                    assigned_to = $7, updated_at = NOW() \
                WHERE id = $1 RETURNING * \
             ) {SCHEDULE_SELECT} FROM s JOIN assets a ON a.id = s.asset_id"
        ))
        .bind(schedule.id)
        .bind(schedule.asset_id)
        .bind(schedule.schedule_type)
        .bind(schedule.interval_days)
        .bind(schedule.next_maintenance_date)
        .bind(schedule.scheduled_by)
        .bind(schedule.assigned_to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting maintenance schedule: {}", id);

        let result = sqlx::query("DELETE FROM maintenance_schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
