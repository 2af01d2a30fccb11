use quiz_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{PostgresUserStore, UserStoreState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, database, state and the HTTP server, in that order.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise verbose defaults for local development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quiz_portal=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: Pretty print output for human readability.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database Initialization (Postgres)
    // The pool connects lazily so the server still comes up, and reports the database
    // as down, when Postgres is unreachable at boot.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(config.store_timeout)
        .connect_lazy(&config.db_url)
        .expect("FATAL: Invalid DATABASE_URL.");

    let store = PostgresUserStore::new(pool, config.store_timeout);
    if let Err(e) = store.ensure_schema().await {
        tracing::warn!("could not ensure users schema at startup: {}", e);
    }
    let store = Arc::new(store) as UserStoreState;

    // 5. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state =
        AppState::new(store, config).expect("FATAL: Invalid password hashing parameters.");

    // 6. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind listener. Check BIND_ADDR.");

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
