// api/tools.rs — Tool endpoints.
//
// Handlers only resolve the caller, run the access check, and delegate to
// the store. Visibility and permission rules live in aihub_core::access.

use super::auth::CurrentUser;
use super::error::ApiResult;
use super::extract::{ApiJson, ApiQuery};
use crate::state::AppState;
use aihub_core::access::{self, ToolPermissions};
use aihub_core::atoms::types::{Page, Tool, ToolInput};
use aihub_core::catalog::{self, ToolQuery};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::info;
use serde::Serialize;
use std::sync::Arc;

/// A tool plus what the caller may do with it, so clients can show or hide
/// edit/delete/approve controls without repeating the rules.
#[derive(Debug, Serialize)]
pub struct ToolView {
    #[serde(flatten)]
    pub tool: Tool,
    pub permissions: ToolPermissions,
}

impl ToolView {
    fn for_user(user: &CurrentUser, tool: Tool) -> Self {
        let permissions = access::permissions(&user.viewer(), &tool);
        ToolView { tool, permissions }
    }
}

pub async fn list_tools(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ToolQuery>,
) -> ApiResult<Json<Page<ToolView>>> {
    let tools = state.with_store(|s| s.list_tools()).await?;
    let page = catalog::search(&user.viewer(), tools, &query);
    Ok(Json(page.map(|t| ToolView::for_user(&user, t))))
}

pub async fn get_tool(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(tool_id): Path<String>,
) -> ApiResult<Json<ToolView>> {
    let tool = state.with_store(move |s| s.get_tool(&tool_id)).await?;
    access::authorize_view(&user.viewer(), &tool)?;
    Ok(Json(ToolView::for_user(&user, tool)))
}

pub async fn create_tool(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(input): ApiJson<ToolInput>,
) -> ApiResult<(StatusCode, Json<ToolView>)> {
    let viewer = user.viewer();
    let input = input.normalized()?;
    let approved = access::approved_on_create(&viewer);
    info!("[api] {} submitting tool '{}' (approved={})", user.0.email, input.name, approved);
    let submitter = user.0.id.clone();
    let tool = state
        .with_store(move |s| s.create_tool(&input, Some(&submitter), approved))
        .await?;
    Ok((StatusCode::CREATED, Json(ToolView::for_user(&user, tool))))
}

pub async fn update_tool(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(tool_id): Path<String>,
    ApiJson(input): ApiJson<ToolInput>,
) -> ApiResult<Json<ToolView>> {
    let id = tool_id.clone();
    let existing = state.with_store(move |s| s.get_tool(&id)).await?;
    access::authorize_edit(&user.viewer(), &existing)?;
    let input = input.normalized()?;
    info!("[api] {} updating tool {}", user.0.email, tool_id);
    let tool = state.with_store(move |s| s.update_tool(&tool_id, &input)).await?;
    Ok(Json(ToolView::for_user(&user, tool)))
}

pub async fn delete_tool(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(tool_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = tool_id.clone();
    let existing = state.with_store(move |s| s.get_tool(&id)).await?;
    access::authorize_delete(&user.viewer(), &existing)?;
    info!("[api] {} deleting tool {} ({})", user.0.email, existing.name, tool_id);
    state.with_store(move |s| s.delete_tool(&tool_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn approve_tool(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(tool_id): Path<String>,
) -> ApiResult<Json<ToolView>> {
    set_approval(&state, &user, tool_id, true).await
}

pub async fn unapprove_tool(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(tool_id): Path<String>,
) -> ApiResult<Json<ToolView>> {
    set_approval(&state, &user, tool_id, false).await
}

async fn set_approval(
    state: &Arc<AppState>,
    user: &CurrentUser,
    tool_id: String,
    approved: bool,
) -> ApiResult<Json<ToolView>> {
    access::require_owner(&user.viewer(), "change tool approval")?;
    info!("[api] {} set approval of {} → {}", user.0.email, tool_id, approved);
    let tool = state
        .with_store(move |s| s.set_tool_approval(&tool_id, approved))
        .await?;
    Ok(Json(ToolView::for_user(user, tool)))
}
