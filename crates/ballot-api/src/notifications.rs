// Notification HTTP routes: organizer broadcasts, audit log, inboxes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use ballot_core::{
    LifecycleError, NotificationDispatcher, NotificationKind, NotificationLog,
    NotificationRecord,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{ApiError, AppState, ListResponse};

/// Request to broadcast a message to a set of recipients
#[derive(Debug, Deserialize, ToSchema)]
pub struct BroadcastRequest {
    pub recipient_ids: Vec<Uuid>,
    pub message: String,
    #[serde(default = "default_kind")]
    pub kind: NotificationKind,
}

fn default_kind() -> NotificationKind {
    NotificationKind::Info
}

/// Create notification routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/events/:event_id/broadcasts",
            post(create_broadcast).get(list_broadcasts),
        )
        .route("/v1/users/:user_id/notifications", get(list_inbox))
        .route("/v1/notifications/:notification_id/read", post(mark_read))
        .with_state(state)
}

/// POST /v1/events/{event_id}/broadcasts - Fan a message out to recipients
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/broadcasts",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = BroadcastRequest,
    responses(
        (status = 201, description = "Broadcast delivered and logged", body = NotificationLog),
        (status = 404, description = "Event not found"),
        (status = 422, description = "No recipients"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn create_broadcast(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<BroadcastRequest>,
) -> Result<(StatusCode, Json<NotificationLog>), ApiError> {
    let dispatcher = NotificationDispatcher::new(state.repo.clone(), state.profiles.clone());
    let log = dispatcher
        .broadcast(event_id, &req.recipient_ids, &req.message, req.kind)
        .await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// GET /v1/events/{event_id}/broadcasts - List the event's audit log
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/broadcasts",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Audit log entries, newest first", body = ListResponse<NotificationLog>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn list_broadcasts(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ListResponse<NotificationLog>>, ApiError> {
    let logs = state.repo.list_logs(event_id).await?;
    Ok(Json(logs.into()))
}

/// GET /v1/users/{user_id}/notifications - List a recipient's inbox
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/notifications",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Inbox entries, newest first", body = ListResponse<NotificationRecord>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn list_inbox(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ListResponse<NotificationRecord>>, ApiError> {
    let inbox = state.repo.list_notifications(user_id).await?;
    Ok(Json(inbox.into()))
}

/// POST /v1/notifications/{notification_id}/read - Mark a notification read
#[utoipa::path(
    post,
    path = "/v1/notifications/{notification_id}/read",
    params(("notification_id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 404, description = "Notification not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let marked = state.repo.mark_notification_read(notification_id).await?;
    if !marked {
        return Err(
            LifecycleError::not_found(format!("notification {notification_id}")).into(),
        );
    }
    Ok(StatusCode::NO_CONTENT)
}
