// api/admin.rs — Admin panel: counters and the review queue.

use super::auth::CurrentUser;
use super::error::ApiResult;
use crate::state::AppState;
use aihub_core::access;
use aihub_core::atoms::types::{HubStats, Tool};
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn stats(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<HubStats>> {
    access::require_owner(&user.viewer(), "view admin stats")?;
    Ok(Json(state.with_store(|s| s.stats()).await?))
}

/// Tools awaiting review, oldest first.
pub async fn pending(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Tool>>> {
    access::require_owner(&user.viewer(), "review pending tools")?;
    let mut tools: Vec<Tool> = state
        .with_store(|s| s.list_tools())
        .await?
        .into_iter()
        .filter(|t| !t.is_approved)
        .collect();
    tools.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(Json(tools))
}
