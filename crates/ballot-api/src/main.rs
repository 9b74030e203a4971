// Ballot API server
// Entrant lifecycle for capacity-limited events: join/leave the waiting
// list, lottery draws, selection responses, and notification broadcasts
// with an append-only audit log.

mod common;
mod entrants;
mod events;
mod notifications;
mod profiles;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use ballot_core::SystemRng;
use ballot_storage::{Database, DbEntrantRepository, DbProfileStore};
use common::{AppState, ListResponse};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        events::create_event,
        events::get_event,
        entrants::join,
        entrants::leave,
        entrants::draw,
        entrants::respond,
        notifications::create_broadcast,
        notifications::list_broadcasts,
        notifications::list_inbox,
        notifications::mark_read,
        profiles::upsert_profile,
        profiles::get_profile,
    ),
    components(
        schemas(
            ballot_core::EventRecord, ballot_core::CreateEvent,
            ballot_core::EntrantRecord, ballot_core::EntrantState,
            ballot_core::GeoPoint, ballot_core::Decision,
            ballot_core::Profile,
            ballot_core::NotificationRecord, ballot_core::NotificationKind,
            ballot_core::NotificationLog,
            ballot_core::DrawOutcome, ballot_core::DrawError,
            entrants::JoinRequest, entrants::DrawRequest,
            entrants::DrawResponse, entrants::RespondRequest,
            notifications::BroadcastRequest,
            profiles::UpsertProfileRequest,
            ListResponse<ballot_core::NotificationRecord>,
            ListResponse<ballot_core::NotificationLog>,
        )
    ),
    tags(
        (name = "events", description = "Event management endpoints"),
        (name = "entrants", description = "Waiting list, lottery draw and selection response endpoints"),
        (name = "notifications", description = "Broadcast, audit log and inbox endpoints"),
        (name = "profiles", description = "Profile endpoints")
    ),
    info(
        title = "Ballot API",
        version = "0.2.0",
        description = "API for event registration with lottery-based selection",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ballot_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("ballot-api starting...");

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    // Create app state: all lifecycle components share the one repository
    let db = Arc::new(db);
    let state = AppState {
        repo: Arc::new(DbEntrantRepository::new((*db).clone())),
        profiles: Arc::new(DbProfileStore::new((*db).clone())),
        rng: Arc::new(SystemRng::new()),
        db: db.clone(),
    };

    // Load CORS allowed origins from environment (optional)
    // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();

    // Build API routes
    let app = Router::new()
        .route("/health", get(health))
        .merge(events::routes(state.clone()))
        .merge(entrants::routes(state.clone()))
        .merge(notifications::routes(state.clone()))
        .merge(profiles::routes(state));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let port = std::env::var("PORT").unwrap_or_else(|_| "9000".into());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("ballot-api listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
