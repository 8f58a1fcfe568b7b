// Request extractors that reject with ApiError, so malformed bodies and
// query strings get the same `{ "error": … }` body as every other failure.

use super::error::ApiError;
use aihub_core::HubError;
use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

/// `Json<T>` with a JSON error body.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        Ok(ApiJson(value))
    }
}

fn json_rejection(err: JsonRejection) -> ApiError {
    let message = match err {
        JsonRejection::JsonDataError(e) => format!("invalid JSON data: {e}"),
        JsonRejection::JsonSyntaxError(e) => format!("JSON syntax error: {e}"),
        JsonRejection::MissingJsonContentType(_) => {
            "missing Content-Type: application/json header".to_string()
        }
        other => format!("failed to read JSON body: {other}"),
    };
    ApiError(HubError::Validation(message))
}

/// `Query<T>` with a JSON error body.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| HubError::validation(format!("invalid query string: {e}")))?;
        Ok(ApiQuery(value))
    }
}
