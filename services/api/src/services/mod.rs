//! Domain services
//!
//! Services enforce business rules on top of the repositories: role policy
//! for user management, existence checks for referenced entities and the
//! partial status updates. They hold no state between requests.

pub mod asset;
pub mod asset_category;
pub mod auth;
pub mod maintenance_record;
pub mod maintenance_schedule;
pub mod user;

use std::fmt;

use common::error::DatabaseError;
use thiserror::Error;

pub use asset::AssetService;
pub use asset_category::AssetCategoryService;
pub use auth::{AuthService, SuperUserSeed};
pub use maintenance_record::MaintenanceRecordService;
pub use maintenance_schedule::MaintenanceScheduleService;
pub use user::UserService;

/// The kind of entity a lookup failed to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Category,
    Asset,
    MaintenanceSchedule,
    MaintenanceRecord,
    Performer,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::User => "user",
            Entity::Category => "category",
            Entity::Asset => "asset",
            Entity::MaintenanceSchedule => "maintenance schedule",
            Entity::MaintenanceRecord => "maintenance record",
            Entity::Performer => "performer",
        })
    }
}

/// Errors returned by domain services
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(Entity),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[source] DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation(constraint) => {
                ServiceError::Conflict(format!("Duplicate value violates {constraint}"))
            }
            DatabaseError::ForeignKeyViolation(constraint) => ServiceError::Conflict(format!(
                "Operation conflicts with related records ({constraint})"
            )),
            other => ServiceError::Database(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
