// Event CRUD HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use ballot_core::{CreateEvent, EventRecord, LifecycleError};
use uuid::Uuid;

use crate::common::{ApiError, AppState};

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event))
        .route("/v1/events/:event_id", get(get_event))
        .with_state(state)
}

/// POST /v1/events - Create a new event
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created successfully", body = EventRecord),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> Result<(StatusCode, Json<EventRecord>), ApiError> {
    let event = state.repo.create_event(input).await?;
    tracing::info!(event_id = %event.id, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /v1/events/{event_id} - Get an event with its lifecycle counters
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = EventRecord),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventRecord>, ApiError> {
    let event = state
        .repo
        .get_event(event_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("event {event_id}")))?;
    Ok(Json(event))
}
