use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
};
use std::sync::Arc;
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

// Core authentication subsystem.
pub mod error;
pub mod hasher;
pub mod repository;
pub mod roles;
pub mod service;
pub mod health;

// HTTP surface and supporting utilities.
pub mod clock;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
use routes::public;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AuthError, HashError, StoreError};
pub use hasher::{CredentialHasher, HashCost};
pub use health::HealthReporter;
pub use repository::{MockUserStore, PostgresUserStore, UserStore, UserStoreState};
pub use roles::RoleResolver;
pub use service::SignupService;

/// ApiDoc
///
/// Auto-generated OpenAPI document for every handler decorated with `#[utoipa::path]`.
/// Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::signup, handlers::legacy_login, handlers::health, handlers::clock),
    components(
        schemas(
            models::Role, models::PublicUser, models::SignupRequest, models::SignupResponse,
            models::LoginRequest, models::LoginResponse, models::HealthReport,
            models::DatabaseHealth, models::DatabaseStatus, models::ClockResponse,
            models::ErrorBody,
        )
    ),
    tags(
        (name = "quiz-portal", description = "Adaptive Quiz Generator authentication API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, cloneable container for every service a handler may need. Built once
/// at startup; nothing in it is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Signup and legacy login orchestration.
    pub auth: SignupService,
    /// Database reachability reporting.
    pub health: HealthReporter,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl AppState {
    /// new
    ///
    /// Wires the services from the configuration around a single shared store. Fails
    /// only if the configured hashing cost is rejected by Argon2.
    pub fn new(store: UserStoreState, config: AppConfig) -> Result<Self, HashError> {
        let hasher = CredentialHasher::new(config.hash_cost)?;
        let auth = SignupService::new(
            Arc::new(config.role_secrets.clone()),
            hasher,
            store.clone(),
            config.master_salt.as_str(),
        );
        let health = HealthReporter::new(store, config.store_timeout, config.model_name.clone());
        Ok(Self {
            auth,
            health,
            config,
        })
    }
}

// --- Axum FromRef Extractor Implementations ---

// Let handlers pull only the component they use out of the shared AppState.

impl FromRef<AppState> for SignupService {
    fn from_ref(app_state: &AppState) -> SignupService {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for HealthReporter {
    fn from_ref(app_state: &AppState) -> HealthReporter {
        app_state.health.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies global middleware and registers the state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: one span per request, tagged with the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echo x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the `TraceLayer` span so every log line of a request carries its
/// `x-request-id` alongside the method and URI.
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
