use crate::{
    error::StoreError,
    models::{Role, UserRecord},
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::{
    collections::HashMap,
    future::Future,
    sync::Arc,
    time::Duration,
};
use tokio::sync::Mutex;
use uuid::Uuid;

/// UserStore Trait
///
/// Abstract contract for user persistence. Handlers and the signup service only see
/// this trait, so the Postgres store and the in-memory mock are interchangeable.
///
/// **Send + Sync + async_trait** are required to share `Arc<dyn UserStore>` across
/// Axum's task boundaries.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Existence pre-check. An optimization only: `insert` is the real authority.
    async fn exists(&self, username: &str) -> Result<bool, StoreError>;

    /// Creates the record. Must fail with `StoreError::DuplicateKey` when the username
    /// is already taken, including when a concurrent insert won the race.
    async fn insert(
        &self,
        username: &str,
        password_digest: &str,
        role: Role,
    ) -> Result<UserRecord, StoreError>;

    /// Lightweight reachability probe. Any failure is `false`.
    async fn ping(&self) -> bool;
}

/// UserStoreState
///
/// The concrete type used to share the store across the application state.
pub type UserStoreState = Arc<dyn UserStore>;

/// Applies the request-scoped timeout to a store future.
async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout),
    }
}

/// PostgresUserStore
///
/// `UserStore` backed by the `users` table. Uniqueness is enforced by the
/// `UNIQUE (username)` constraint, and every call carries `timeout`.
pub struct PostgresUserStore {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// ensure_schema
    ///
    /// Creates the `users` table if it does not exist. Idempotent; safe at every startup.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        with_timeout(
            self.timeout,
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id UUID PRIMARY KEY,
                    username TEXT NOT NULL UNIQUE,
                    password_digest TEXT NOT NULL,
                    role TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )
                "#,
            )
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        with_timeout(
            self.timeout,
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool),
        )
        .await
    }

    /// insert
    ///
    /// A unique violation (SQLSTATE 23505) is translated to `DuplicateKey`; all other
    /// database errors pass through untouched.
    async fn insert(
        &self,
        username: &str,
        password_digest: &str,
        role: Role,
    ) -> Result<UserRecord, StoreError> {
        let result = with_timeout(
            self.timeout,
            sqlx::query(
                "INSERT INTO users (id, username, password_digest, role) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(username)
            .bind(password_digest)
            .bind(role.as_str())
            .execute(&self.pool),
        )
        .await;

        match result {
            Ok(_) => Ok(UserRecord {
                username: username.to_string(),
                password_digest: password_digest.to_string(),
                role,
            }),
            Err(StoreError::Database(sqlx::Error::Database(db_err)))
                if db_err.is_unique_violation() =>
            {
                Err(StoreError::DuplicateKey)
            }
            Err(e) => {
                tracing::error!("insert user error: {:?}", e);
                Err(e)
            }
        }
    }

    async fn ping(&self) -> bool {
        match with_timeout(self.timeout, sqlx::query("SELECT 1").execute(&self.pool)).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("database ping failed: {}", e);
                false
            }
        }
    }
}

// --- In-Memory Implementation (For Tests and Local Demos) ---

/// MockUserStore
///
/// In-memory `UserStore`. The check-and-insert runs under one lock, which gives the
/// same uniqueness guarantee as the database constraint.
#[derive(Debug, Clone, Default)]
pub struct MockUserStore {
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
    /// When true, every call fails as if the database were down.
    pub unreachable: bool,
    /// Artificial latency added to `ping`, for probe-timeout scenarios.
    pub ping_delay: Option<Duration>,
}

impl MockUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn with_ping_delay(delay: Duration) -> Self {
        Self {
            ping_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Direct read access for assertions on what was persisted.
    pub async fn get(&self, username: &str) -> Option<UserRecord> {
        self.users.lock().await.get(username).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.unreachable {
            return Err(StoreError::Unavailable(
                "mock store configured as unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        self.check_reachable()?;
        Ok(self.users.lock().await.contains_key(username))
    }

    async fn insert(
        &self,
        username: &str,
        password_digest: &str,
        role: Role,
    ) -> Result<UserRecord, StoreError> {
        self.check_reachable()?;
        let mut users = self.users.lock().await;
        if users.contains_key(username) {
            return Err(StoreError::DuplicateKey);
        }
        let record = UserRecord {
            username: username.to_string(),
            password_digest: password_digest.to_string(),
            role,
        };
        users.insert(username.to_string(), record.clone());
        Ok(record)
    }

    async fn ping(&self) -> bool {
        if let Some(delay) = self.ping_delay {
            tokio::time::sleep(delay).await;
        }
        !self.unreachable
    }
}
