// Common DTOs and error mapping for the public API
//
// Every handler surfaces domain errors through ApiError so rejection
// reasons reach the client verbatim while storage failures stay generic.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ballot_core::{
    DrawRng, EntrantRepository, LifecycleError, ProfileStore,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn EntrantRepository>,
    pub profiles: Arc<dyn ProfileStore>,
    pub rng: Arc<dyn DrawRng>,
    pub db: Arc<ballot_storage::Database>,
}

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Domain error carried to the HTTP layer
pub struct ApiError(LifecycleError);

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self.0 {
            LifecycleError::Validation(reason) => {
                (StatusCode::UNPROCESSABLE_ENTITY, reason.clone())
            }
            LifecycleError::Conflict(reason) => (StatusCode::CONFLICT, reason.clone()),
            LifecycleError::NotFound(reason) => (StatusCode::NOT_FOUND, reason.clone()),
            LifecycleError::Storage(e) => {
                tracing::error!("storage failure: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        (status, Json(json!({ "reason": reason }))).into_response()
    }
}
