// Profile HTTP routes
//
// Minimal upsert/read surface so display names resolve in broadcasts.
// The lifecycle core only ever reads profiles through the ProfileStore
// trait.

use axum::{
    extract::{Path, State},
    routing::put,
    Json, Router,
};
use ballot_core::{LifecycleError, Profile};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{ApiError, AppState};

/// Request to create or replace a profile
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(default = "default_enabled")]
    pub notifications_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Create profile routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/users/:user_id/profile",
            put(upsert_profile).get(get_profile),
        )
        .with_state(state)
}

/// PUT /v1/users/{user_id}/profile - Create or replace a profile
#[utoipa::path(
    put,
    path = "/v1/users/{user_id}/profile",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile stored", body = Profile),
        (status = 500, description = "Internal server error")
    ),
    tag = "profiles"
)]
pub async fn upsert_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let row = state
        .db
        .upsert_profile(
            user_id,
            req.full_name.as_deref(),
            req.email.as_deref(),
            req.notifications_enabled,
        )
        .await
        .map_err(LifecycleError::Storage)?;
    Ok(Json(row.into()))
}

/// GET /v1/users/{user_id}/profile - Read a profile
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/profile",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile found", body = Profile),
        (status = 404, description = "No profile for this user"),
        (status = 500, description = "Internal server error")
    ),
    tag = "profiles"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("profile {user_id}")))?;
    Ok(Json(profile))
}
