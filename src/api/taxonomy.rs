// api/taxonomy.rs — Categories, roles and tags. Anyone signed in can read;
// only the Owner can change them.

use super::auth::CurrentUser;
use super::error::ApiResult;
use super::extract::ApiJson;
use crate::state::AppState;
use aihub_core::access;
use aihub_core::atoms::types::{Category, CategoryInput, NameInput, Role, Tag};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::info;
use std::sync::Arc;

// ── Categories ─────────────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.with_store(|s| s.list_categories()).await?))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    access::require_owner(&user.viewer(), "manage categories")?;
    let input = input.normalized()?;
    info!("[api] {} creating category '{}'", user.0.email, input.name);
    let category = state.with_store(move |s| s.create_category(&input)).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(category_id): Path<String>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<Json<Category>> {
    access::require_owner(&user.viewer(), "manage categories")?;
    let input = input.normalized()?;
    info!("[api] {} updating category {} → '{}'", user.0.email, category_id, input.name);
    Ok(Json(state.with_store(move |s| s.update_category(&category_id, &input)).await?))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(category_id): Path<String>,
) -> ApiResult<StatusCode> {
    access::require_owner(&user.viewer(), "manage categories")?;
    info!("[api] {} deleting category {}", user.0.email, category_id);
    state.with_store(move |s| s.delete_category(&category_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Roles ──────────────────────────────────────────────────────────────

pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<Role>>> {
    Ok(Json(state.with_store(|s| s.list_roles()).await?))
}

pub async fn create_role(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(input): ApiJson<NameInput>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    access::require_owner(&user.viewer(), "manage roles")?;
    let input = input.normalized()?;
    info!("[api] {} creating role '{}'", user.0.email, input.name);
    let role = state.with_store(move |s| s.create_role(&input)).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn rename_role(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(role_id): Path<String>,
    ApiJson(input): ApiJson<NameInput>,
) -> ApiResult<Json<Role>> {
    access::require_owner(&user.viewer(), "manage roles")?;
    let input = input.normalized()?;
    info!("[api] {} renaming role {} → '{}'", user.0.email, role_id, input.name);
    Ok(Json(state.with_store(move |s| s.rename_role(&role_id, &input)).await?))
}

pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    access::require_owner(&user.viewer(), "manage roles")?;
    info!("[api] {} deleting role {}", user.0.email, role_id);
    state.with_store(move |s| s.delete_role(&role_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Tags ───────────────────────────────────────────────────────────────

pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(state.with_store(|s| s.list_tags()).await?))
}

pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(input): ApiJson<NameInput>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    access::require_owner(&user.viewer(), "manage tags")?;
    let input = input.normalized()?;
    info!("[api] {} creating tag '{}'", user.0.email, input.name);
    let tag = state.with_store(move |s| s.create_tag(&input)).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn rename_tag(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(tag_id): Path<String>,
    ApiJson(input): ApiJson<NameInput>,
) -> ApiResult<Json<Tag>> {
    access::require_owner(&user.viewer(), "manage tags")?;
    let input = input.normalized()?;
    info!("[api] {} renaming tag {} → '{}'", user.0.email, tag_id, input.name);
    Ok(Json(state.with_store(move |s| s.rename_tag(&tag_id, &input)).await?))
}

pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(tag_id): Path<String>,
) -> ApiResult<StatusCode> {
    access::require_owner(&user.viewer(), "manage tags")?;
    info!("[api] {} deleting tag {}", user.0.email, tag_id);
    state.with_store(move |s| s.delete_tag(&tag_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
