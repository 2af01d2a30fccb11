use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorBody;

/// StoreError
///
/// Failures reported by a `UserStore`. `DuplicateKey` is the only variant the signup
/// flow treats as a domain outcome; everything else is a backend failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The uniqueness constraint on `username` rejected the insert.
    #[error("duplicate key")]
    DuplicateKey,
    #[error("store call timed out")]
    Timeout,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// HashError
///
/// Errors raised by the credential hasher. Verification never produces one of these:
/// a bad digest simply fails to verify.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid hashing parameters: {0}")]
    Params(argon2::Error),
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("hashing task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// AuthError
///
/// Every way a signup or login request can be rejected. The HTTP layer maps each
/// variant to exactly one status code and `detail` string.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect Secret")]
    InvalidSecret,
    #[error("Invalid Master Secret")]
    InvalidMasterSalt,
    #[error("User Already Exists")]
    UserExists,
    #[error("Password too long (max 72 chars)")]
    PasswordTooLong,
    #[error("store failure: {0}")]
    Store(StoreError),
    #[error("hashing failure: {0}")]
    Hashing(#[from] HashError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            // A duplicate caught by the store is the same outcome as the pre-check.
            StoreError::DuplicateKey => AuthError::UserExists,
            other => AuthError::Store(other),
        }
    }
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidSecret | AuthError::InvalidMasterSalt => StatusCode::UNAUTHORIZED,
            AuthError::UserExists => StatusCode::CONFLICT,
            AuthError::PasswordTooLong => StatusCode::BAD_REQUEST,
            AuthError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing reason string. Backend variants hide their internals.
    pub fn detail(&self) -> String {
        match self {
            AuthError::Store(_) => "Database Unavailable".to_string(),
            AuthError::Hashing(_) => "Internal Server Error".to_string(),
            client_error => client_error.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = ErrorBody {
            detail: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}
