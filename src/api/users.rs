// api/users.rs — The caller's own profile plus Owner-only user management.

use super::auth::CurrentUser;
use super::error::ApiResult;
use super::extract::ApiJson;
use crate::state::AppState;
use aihub_core::access;
use aihub_core::atoms::types::{User, UserInput};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct Me {
    #[serde(flatten)]
    pub user: User,
    pub is_owner: bool,
}

#[derive(Debug, Deserialize)]
pub struct RoleAssignment {
    /// `null` clears the role.
    pub role_id: Option<String>,
}

pub async fn me(user: CurrentUser) -> Json<Me> {
    let is_owner = user.0.is_owner();
    Json(Me { user: user.0, is_owner })
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<User>>> {
    access::require_owner(&user.viewer(), "list users")?;
    Ok(Json(state.with_store(|s| s.list_users()).await?))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<(StatusCode, Json<User>)> {
    access::require_owner(&user.viewer(), "manage users")?;
    let input = input.normalized()?;
    info!("[api] {} adding user {}", user.0.email, input.email);
    let created = state.with_store(move |s| s.create_user(&input)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn set_user_role(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(user_id): Path<String>,
    ApiJson(body): ApiJson<RoleAssignment>,
) -> ApiResult<Json<User>> {
    access::require_owner(&user.viewer(), "manage users")?;
    let role_id = body
        .role_id
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    info!(
        "[api] {} setting role of {} → {}",
        user.0.email,
        user_id,
        role_id.as_deref().unwrap_or("none")
    );
    let updated = state
        .with_store(move |s| s.set_user_role(&user_id, role_id.as_deref()))
        .await?;
    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    access::require_owner(&user.viewer(), "manage users")?;
    info!("[api] {} deleting user {}", user.0.email, user_id);
    state.with_store(move |s| s.delete_user(&user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
