//! Login and caller identity

use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use super::entity_response;
use crate::{
    auth::{AnyRole, Authorized},
    error::{ApiError, ApiResult},
    models::LoginCredentials,
    state::AppState,
};

/// Exchange email and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(credentials), _): WithRejection<Json<LoginCredentials>, ApiError>,
) -> ApiResult<Json<Value>> {
    let (token, user) = state.auth.login(&credentials).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "token_type": "Bearer",
        "expires_in": state.jwt.expiry_secs(),
        "user": user,
    })))
}

/// The authenticated caller's own account
pub async fn me(
    State(state): State<AppState>,
    auth: Authorized<AnyRole>,
) -> ApiResult<Json<Value>> {
    let user = state.users.get(auth.user.id).await?;
    entity_response("User retrieved successfully", "user", user)
}
