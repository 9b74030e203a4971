// Entrant lifecycle HTTP routes: join, leave, draw, respond
//
// The client resolves its own geolocation and ships the coordinates with
// the join request; the handler wraps them in a LocationProvider so the
// eligibility gate stays ignorant of where locations come from.

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use ballot_core::{
    Decision, DecisionHandler, DrawOutcome, EligibilityGate, EntrantRecord, GeoPoint,
    LifecycleError, LocationProvider, LotteryDraw, NotificationDispatcher, NotificationKind,
    Result as CoreResult,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{ApiError, AppState};

/// Location provider fed from the join request body
struct ProvidedLocation(Option<GeoPoint>);

#[async_trait]
impl LocationProvider for ProvidedLocation {
    async fn resolve(&self, _user_id: Uuid) -> CoreResult<Option<GeoPoint>> {
        Ok(self.0)
    }
}

/// Request to join an event's waiting list
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinRequest {
    pub user_id: Uuid,
    /// Client-resolved location, required when the event demands one
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Request to run a lottery draw
#[derive(Debug, Deserialize, ToSchema)]
pub struct DrawRequest {
    pub count: usize,
    /// Send a selection offer to each winner (default true)
    #[serde(default = "default_true")]
    pub notify_winners: bool,
    /// Send a not-selected notice to the remaining waiting list (default false)
    #[serde(default)]
    pub notify_losers: bool,
}

fn default_true() -> bool {
    true
}

/// Draw result plus the audit log ids of any follow-up broadcasts
#[derive(Debug, Serialize, ToSchema)]
pub struct DrawResponse {
    #[serde(flatten)]
    pub outcome: DrawOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_log_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loser_log_id: Option<Uuid>,
}

/// An entrant's response to their selection
#[derive(Debug, Deserialize, ToSchema)]
pub struct RespondRequest {
    pub decision: Decision,
}

/// Create entrant lifecycle routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events/:event_id/entrants", post(join))
        .route("/v1/events/:event_id/entrants/:user_id", delete(leave))
        .route("/v1/events/:event_id/draw", post(draw))
        .route(
            "/v1/events/:event_id/entrants/:user_id/response",
            post(respond),
        )
        .with_state(state)
}

/// POST /v1/events/{event_id}/entrants - Join the waiting list
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/entrants",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = JoinRequest,
    responses(
        (status = 201, description = "Admitted to waiting list", body = EntrantRecord),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Rejected: already engaged, cancelled, duplicate, full, or location required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "entrants"
)]
pub async fn join(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<JoinRequest>,
) -> Result<(StatusCode, Json<EntrantRecord>), ApiError> {
    let location = match (req.latitude, req.longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    };
    let gate = EligibilityGate::new(
        state.repo.clone(),
        std::sync::Arc::new(ProvidedLocation(location)),
    );
    let record = gate.join(event_id, req.user_id).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /v1/events/{event_id}/entrants/{user_id} - Leave the waiting list
#[utoipa::path(
    delete,
    path = "/v1/events/{event_id}/entrants/{user_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Removed from waiting list"),
        (status = 404, description = "User is not on the waiting list"),
        (status = 500, description = "Internal server error")
    ),
    tag = "entrants"
)]
pub async fn leave(
    State(state): State<AppState>,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let gate = EligibilityGate::new(
        state.repo.clone(),
        std::sync::Arc::new(ProvidedLocation(None)),
    );
    gate.leave(event_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/events/{event_id}/draw - Run a lottery draw
///
/// Winner and loser notifications are explicit follow-up broadcasts, not
/// draw side effects; a notification failure after a committed draw is
/// reported but does not undo any selection.
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/draw",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = DrawRequest,
    responses(
        (status = 200, description = "Draw completed (possibly with per-winner errors)", body = DrawResponse),
        (status = 404, description = "Event not found"),
        (status = 422, description = "Invalid draw size"),
        (status = 500, description = "Internal server error")
    ),
    tag = "entrants"
)]
pub async fn draw(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<DrawRequest>,
) -> Result<Json<DrawResponse>, ApiError> {
    let event = state
        .repo
        .get_event(event_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found(format!("event {event_id}")))?;

    let engine = LotteryDraw::new(state.repo.clone(), state.rng.clone());
    let outcome = engine.draw(event_id, req.count).await?;

    let dispatcher = NotificationDispatcher::new(state.repo.clone(), state.profiles.clone());

    let winner_log_id = if req.notify_winners && !outcome.selected.is_empty() {
        let message = format!(
            "You have been selected for {}! Accept or decline your spot.",
            event.name
        );
        let log = dispatcher
            .broadcast(
                event_id,
                &outcome.selected,
                &message,
                NotificationKind::SelectionOffer,
            )
            .await?;
        Some(log.id)
    } else {
        None
    };

    let loser_log_id = if req.notify_losers {
        let losers = engine.remaining_waiting(event_id).await?;
        if losers.is_empty() {
            None
        } else {
            let message = format!("You were not selected for {} this time.", event.name);
            let log = dispatcher
                .broadcast(event_id, &losers, &message, NotificationKind::NotSelected)
                .await?;
            Some(log.id)
        }
    } else {
        None
    };

    Ok(Json(DrawResponse {
        outcome,
        winner_log_id,
        loser_log_id,
    }))
}

/// POST /v1/events/{event_id}/entrants/{user_id}/response - Accept or decline a selection
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/entrants/{user_id}/response",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    request_body = RespondRequest,
    responses(
        (status = 204, description = "Response applied"),
        (status = 409, description = "User is not currently selected"),
        (status = 500, description = "Internal server error")
    ),
    tag = "entrants"
)]
pub async fn respond(
    State(state): State<AppState>,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<RespondRequest>,
) -> Result<StatusCode, ApiError> {
    let handler = DecisionHandler::new(state.repo.clone());
    handler.respond(event_id, user_id, req.decision).await?;
    Ok(StatusCode::NO_CONTENT)
}
