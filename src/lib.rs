use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Store side: HTTP handlers over the repository.
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Console side: typed client and the public site, admin and profile views.
pub mod client;

pub mod routes;
use routes::{content, public, registrations};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for both stores, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_content, handlers::create_content, handlers::update_settings,
        handlers::delete_content,
        handlers::list_registrations, handlers::create_registration,
        handlers::update_registration, handlers::delete_registration
    ),
    components(
        schemas(
            models::ContentType, models::NewsItem, models::Achievement, models::GalleryItem,
            models::SiteSettings, models::Registration, models::CreateNewsRequest,
            models::CreateAchievementRequest, models::CreateGalleryItemRequest,
            models::CreateRegistrationRequest, models::UpdateRegistrationRequest,
            models::MessageResponse, models::ErrorBody, models::HealthResponse,
        )
    ),
    tags(
        (name = "lspd-portal", description = "LSPD community site: content and registration stores")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cloneable container for the services every request needs.
#[derive(Clone)]
pub struct AppState {
    /// Persistence for both stores (Postgres or in-memory).
    pub repo: RepositoryState,
    pub config: AppConfig,
}

// Handlers pull only the piece of state they use.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles both stores, the health probe and the Swagger UI, then wraps them in the
/// request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    // Both stores answer every preflight with `*`.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(content::content_routes())
        .merge(registrations::registration_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span. Every log line of one request carries its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
