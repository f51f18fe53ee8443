//! User management handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use common::pagination::SortDirection;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{check, entity_response, list_query, message_response, page_response};
use crate::{
    auth::{AdminTier, Authorized},
    error::{ApiError, ApiResult},
    models::{NewUser, Role, UserFilter, UserPatch, UserSortField},
    state::AppState,
    validation::{validate_email, validate_name, validate_password},
};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl CreateUserRequest {
    fn validate(&self) -> ApiResult<()> {
        check(validate_name("Name", &self.name))?;
        check(validate_email(&self.email))?;
        check(validate_password(&self.password))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUserRequest {
    fn validate(&self) -> ApiResult<()> {
        if let Some(name) = &self.name {
            check(validate_name("Name", name))?;
        }
        if let Some(email) = &self.email {
            check(validate_email(email))?;
        }
        if let Some(password) = &self.password {
            check(validate_password(password))?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub sort_by: Option<UserSortField>,
    pub sort_dir: Option<SortDirection>,
    pub search: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Query(params), _): WithRejection<Query<ListUsersParams>, ApiError>,
) -> ApiResult<Json<Value>> {
    let query = list_query(
        UserFilter {
            search: params.search,
        },
        params.page,
        params.items_per_page,
        params.sort_by,
        params.sort_dir,
    )?;

    let page = state.users.list(&query).await?;
    page_response("Users retrieved successfully", "users", page)
}

pub async fn get_user(
    State(state): State<AppState>,
    _auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    let user = state.users.get(id).await?;
    entity_response("User retrieved successfully", "user", user)
}

pub async fn create_user(
    State(state): State<AppState>,
    auth: Authorized<AdminTier>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    payload.validate()?;

    let user = state
        .users
        .create(
            NewUser {
                id: payload.id,
                name: payload.name,
                email: payload.email,
                password: payload.password,
                role: payload.role,
            },
            &auth.user,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        entity_response("User created successfully", "user", user)?,
    ))
}

pub async fn update_user(
    State(state): State<AppState>,
    auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> ApiResult<Json<Value>> {
    payload.validate()?;

    let patch = UserPatch {
        name: payload.name,
        email: payload.email,
        password: payload.password,
        role: payload.role,
    };
    let user = state.users.update(id, patch, &auth.user).await?;
    entity_response("User updated successfully", "user", user)
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth: Authorized<AdminTier>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<Value>> {
    state.users.delete(id, &auth.user).await?;
    Ok(message_response("User deleted successfully"))
}
