use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Every endpoint the service exposes. None of them require a session: signup is gated
/// by the role secret and the legacy login by the master salt, both checked inside the
/// signup service rather than by middleware.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Current date and time in UTC and the configured local zone.
        .route("/", get(handlers::clock))
        // GET /api/health
        // Server status plus database reachability. Always 200, even when the database is down.
        .route("/api/health", get(handlers::health))
        // POST /api/auth/signup
        // Creates a user whose role is derived from the shared secret.
        .route("/api/auth/signup", post(handlers::signup))
        // POST /auth/login
        // Legacy login: master salt + role secret, returns a placeholder token.
        .route("/auth/login", post(handlers::legacy_login))
}
