//! User model and related functionality

use chrono::{DateTime, Utc};
use common::pagination::{ListQuery, Sort, SortColumn, SortDirection};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Role;

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload
///
/// `password` is the plaintext credential; it is hashed by the user service
/// and never stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// User update payload
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// User login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Filters for listing users
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    /// Case-insensitive substring of name or email
    pub search: Option<String>,
}

/// Sortable user columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortField {
    Id,
    Name,
    Email,
    Role,
    CreatedAt,
    UpdatedAt,
}

impl UserSortField {
    /// Ordering used when the caller does not choose a column
    pub const DEFAULT_SORT: Sort<Self> = Sort {
        field: UserSortField::CreatedAt,
        direction: SortDirection::Desc,
    };
}

impl SortColumn for UserSortField {
    const TIE_BREAKER: &'static str = "id";

    fn column(self) -> &'static str {
        match self {
            UserSortField::Id => "id",
            UserSortField::Name => "name",
            UserSortField::Email => "email",
            UserSortField::Role => "role",
            UserSortField::CreatedAt => "created_at",
            UserSortField::UpdatedAt => "updated_at",
        }
    }
}

pub type UserQuery = ListQuery<UserFilter, UserSortField>;
