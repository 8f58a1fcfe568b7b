// Caller identity.
//
// Sign-in happens upstream: the SSO proxy in front of the hub authenticates
// the browser and forwards the user's email in a trusted header (configured
// by `user_header`). Here we only resolve that email to a catalog user.

use super::error::ApiError;
use crate::state::AppState;
use aihub_core::atoms::types::User;
use aihub_core::{HubError, Viewer};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// The resolved catalog user for this request.
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn viewer(&self) -> Viewer {
        Viewer::from(&self.0)
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = state.config.user_header.as_str();
        let email = parts
            .headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| HubError::Unauthorized(format!("missing {header} header")))?;

        let email = email.to_string();
        let lookup = email.clone();
        let user = state
            .with_store(move |s| s.get_user_by_email(&lookup))
            .await?
            .ok_or_else(|| HubError::Unauthorized(format!("no catalog user for {email}")))?;
        Ok(CurrentUser(user))
    }
}
