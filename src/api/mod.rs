// SoftArt AI HUB — HTTP API
//
// Thin axum handlers. Each one resolves the caller (auth), checks access,
// delegates to the store and serializes the result. Routes:
//   /api/me
//   /api/tools[/:id[/approve|/unapprove]]
//   /api/categories[/:id]   /api/roles[/:id]   /api/tags[/:id]
//   /api/users[/:id[/role]]
//   /api/admin/stats   /api/admin/pending

use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

pub mod admin;
pub mod auth;
pub mod error;
pub mod extract;
pub mod taxonomy;
pub mod tools;
pub mod users;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiQuery};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(users::me))
        .route("/tools", get(tools::list_tools).post(tools::create_tool))
        .route(
            "/tools/:id",
            get(tools::get_tool).put(tools::update_tool).delete(tools::delete_tool),
        )
        .route("/tools/:id/approve", post(tools::approve_tool))
        .route("/tools/:id/unapprove", post(tools::unapprove_tool))
        .route("/categories", get(taxonomy::list_categories).post(taxonomy::create_category))
        .route(
            "/categories/:id",
            put(taxonomy::update_category).delete(taxonomy::delete_category),
        )
        .route("/roles", get(taxonomy::list_roles).post(taxonomy::create_role))
        .route("/roles/:id", put(taxonomy::rename_role).delete(taxonomy::delete_role))
        .route("/tags", get(taxonomy::list_tags).post(taxonomy::create_tag))
        .route("/tags/:id", put(taxonomy::rename_tag).delete(taxonomy::delete_tag))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", delete(users::delete_user))
        .route("/users/:id/role", put(users::set_user_role))
        .route("/admin/stats", get(admin::stats))
        .route("/admin/pending", get(admin::pending))
}
