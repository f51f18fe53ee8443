//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{Argon2Hasher, CredentialHasher, JwtService};
use crate::repositories::{
    AssetCategoryRepository, AssetRepository, MaintenanceRecordRepository,
    MaintenanceScheduleRepository, PgAssetCategoryRepository, PgAssetRepository,
    PgMaintenanceRecordRepository, PgMaintenanceScheduleRepository, PgUserRepository,
    UserRepository,
};
use crate::services::{
    AssetCategoryService, AssetService, AuthService, MaintenanceRecordService,
    MaintenanceScheduleService, UserService,
};

/// The set of gateways the services are wired to
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn AssetCategoryRepository>,
    pub assets: Arc<dyn AssetRepository>,
    pub schedules: Arc<dyn MaintenanceScheduleRepository>,
    pub records: Arc<dyn MaintenanceRecordRepository>,
}

impl Repositories {
    /// PostgreSQL-backed gateways sharing one pool
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            categories: Arc::new(PgAssetCategoryRepository::new(pool.clone())),
            assets: Arc::new(PgAssetRepository::new(pool.clone())),
            schedules: Arc::new(PgMaintenanceScheduleRepository::new(pool.clone())),
            records: Arc::new(PgMaintenanceRecordRepository::new(pool.clone())),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt: Arc<JwtService>,
    pub auth: AuthService,
    pub users: UserService,
    pub categories: AssetCategoryService,
    pub assets: AssetService,
    pub schedules: MaintenanceScheduleService,
    pub records: MaintenanceRecordService,
}

impl AppState {
    /// Production wiring: PostgreSQL gateways and Argon2 credentials
    pub fn new(db_pool: PgPool, jwt: JwtService) -> Self {
        let repositories = Repositories::postgres(&db_pool);
        Self::with_repositories(db_pool, jwt, repositories, Arc::new(Argon2Hasher))
    }

    pub fn with_repositories(
        db_pool: PgPool,
        jwt: JwtService,
        repos: Repositories,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        let jwt = Arc::new(jwt);

        Self {
            db_pool,
            auth: AuthService::new(repos.users.clone(), hasher.clone(), jwt.clone()),
            users: UserService::new(repos.users.clone(), hasher),
            categories: AssetCategoryService::new(repos.categories.clone()),
            assets: AssetService::new(repos.assets.clone(), repos.categories.clone()),
            schedules: MaintenanceScheduleService::new(
                repos.schedules.clone(),
                repos.assets.clone(),
            ),
            records: MaintenanceRecordService::new(
                repos.records,
                repos.assets,
                repos.schedules,
                repos.users,
            ),
            jwt,
        }
    }
}
