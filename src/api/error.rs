use aihub_core::HubError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde_json::json;

/// HubError at the HTTP boundary. Each variant maps to exactly one status;
/// server-side failures are logged and replaced by a generic message.
#[derive(Debug)]
pub struct ApiError(pub HubError);

impl From<HubError> for ApiError {
    fn from(e: HubError) -> Self {
        ApiError(e)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            HubError::NotFound { .. } => StatusCode::NOT_FOUND,
            HubError::Validation(_) => StatusCode::BAD_REQUEST,
            HubError::Conflict(_) => StatusCode::CONFLICT,
            HubError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HubError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("[api] {}", self.0);
            "internal server error".to_string()
        } else {
            warn!("[api] {} {}", status.as_u16(), self.0);
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (HubError::not_found("Tool", "x"), StatusCode::NOT_FOUND),
            (HubError::validation("bad"), StatusCode::BAD_REQUEST),
            (HubError::Conflict("dup".into()), StatusCode::CONFLICT),
            (HubError::Unauthorized("who".into()), StatusCode::UNAUTHORIZED),
            (HubError::forbidden("no"), StatusCode::FORBIDDEN),
            (HubError::Other("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }
}
