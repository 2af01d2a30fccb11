use crate::{
    clock,
    config::AppConfig,
    error::AuthError,
    health::HealthReporter,
    models::{
        ClockResponse, ErrorBody, HealthReport, LoginRequest, LoginResponse, SignupRequest, SignupResponse,
    },
    service::SignupService,
};
use axum::{Json, extract::State};
use chrono::Utc;

// --- Handlers ---

/// signup
///
/// [Public Route] Creates an account whose role is derived from the shared secret.
///
/// *Error precedence*: an incorrect secret wins over an existing user, which wins over
/// an over-long password.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Signed up", body = SignupResponse),
        (status = 400, description = "Password too long", body = ErrorBody),
        (status = 401, description = "Incorrect secret", body = ErrorBody),
        (status = 409, description = "User already exists", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody)
    )
)]
pub async fn signup(
    State(service): State<SignupService>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AuthError> {
    let response = service.signup(payload).await?;
    Ok(Json(response))
}

/// legacy_login
///
/// [Public Route] Legacy login kept for older clients. Validates the master salt and
/// the role secret only; see `SignupService::legacy_login`.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid master secret or incorrect secret", body = ErrorBody)
    )
)]
pub async fn legacy_login(
    State(service): State<SignupService>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let response = service.legacy_login(payload).await?;
    Ok(Json(response))
}

/// health
///
/// [Public Route] Always 200. Database reachability is part of the body, not the status.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Health report", body = HealthReport))
)]
pub async fn health(State(reporter): State<HealthReporter>) -> Json<HealthReport> {
    Json(reporter.report().await)
}

/// clock
///
/// [Public Route] Current date and time in UTC and the configured local zone.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Current time", body = ClockResponse))
)]
pub async fn clock(State(config): State<AppConfig>) -> Json<ClockResponse> {
    Json(clock::snapshot(Utc::now(), config.local_timezone))
}
