//! User repository for database operations

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::{Conditions, like_pattern};
use crate::models::{Role, User, UserFilter, UserQuery, UserSortField};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// Persistence gateway for user accounts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; `user.password_hash` must already be a digest
    async fn create(&self, user: &User) -> DatabaseResult<User>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Exact, case-sensitive email lookup
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Whether at least one account holds `role`
    async fn exists_with_role(&self, role: Role) -> DatabaseResult<bool>;

    /// One page of users matching the query, plus the unpaginated total
    async fn list(&self, query: &UserQuery) -> DatabaseResult<(Vec<User>, i64)>;

    /// Overwrite every mutable column; `None` when the row is gone
    async fn update(&self, user: &User) -> DatabaseResult<Option<User>>;

    /// Returns `false` when no row was deleted
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

/// User repository backed by PostgreSQL
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    let mut conditions = Conditions::new();
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        conditions.push(builder);
        builder
            .push("(name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn count_query(filter: &UserFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM users");
    push_filter(&mut builder, filter);
    builder
}

fn select_query(query: &UserQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
    push_filter(&mut builder, &query.filter);
    builder
        .push(" ORDER BY ")
        .push(query.order_by(UserSortField::DEFAULT_SORT))
        .push(" LIMIT ")
        .push_bind(query.page.limit())
        .push(" OFFSET ")
        .push_bind(query.page.offset());
    builder
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> DatabaseResult<User> {
        info!("Creating new user: {}", user.id);

        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        info!("Finding user by ID: {}", id);

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        info!("Finding user by email: {}", email);

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn exists_with_role(&self, role: Role) -> DatabaseResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE role = $1)")
                .bind(role)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list(&self, query: &UserQuery) -> DatabaseResult<(Vec<User>, i64)> {
        debug!("Listing users: {:?}", query);

        let mut count = count_query(&query.filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = select_query(query);
        let users = select.build_query_as::<User>().fetch_all(&self.pool).await?;

        Ok((users, total))
    }

    async fn update(&self, user: &User) -> DatabaseResult<Option<User>> {
        info!("Updating user: {}", user.id);

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $2, email = $3, password_hash = $4, role = $5, \
             updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
