use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Domain Types ---

/// Role
///
/// The access tier assigned to a user at signup. The set is closed: a secret can only
/// ever map to one of these variants, and the stored `role` column is always one of
/// their snake_case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Admin,
    Regular,
    FreeTrial,
}

impl Role {
    /// The canonical name used on the wire and in the `users.role` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Regular => "regular",
            Role::FreeTrial => "free_trial",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "regular" => Ok(Role::Regular),
            "free_trial" => Ok(Role::FreeTrial),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// UserRecord
///
/// The persisted user document. Holds the Argon2 digest, so it is deliberately not
/// `Serialize`: anything leaving the process goes through [`UserRecord::sanitized`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    // Unique, case-sensitive identifier.
    pub username: String,
    // PHC-encoded Argon2id digest. Never the plaintext.
    pub password_digest: String,
    pub role: Role,
}

impl UserRecord {
    /// Strips the digest, leaving only the fields a client may see.
    pub fn sanitized(&self) -> PublicUser {
        PublicUser {
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// PublicUser
///
/// Output schema for a user record without credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PublicUser {
    pub username: String,
    pub role: Role,
}

// --- Request Payloads ---

/// SignupRequest
///
/// Input schema for `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    /// Shared secret that determines the role granted to the new account.
    pub secret: String,
}

/// LoginRequest
///
/// Input schema for the legacy `POST /auth/login` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub secret: String,
    /// Must match the configured master salt before the secret is even looked at.
    pub salt: String,
}

// --- Response Payloads ---

/// SignupResponse
///
/// Returned after a successful signup. `access_token` is a placeholder, not a signed token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SignupResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: PublicUser,
}

/// LoginResponse
///
/// Flat response shape kept for the legacy login clients.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub role: Role,
    pub username: String,
}

/// DatabaseStatus
///
/// Reachability of the backing store as seen by the health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DatabaseStatus {
    Healthy,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DatabaseHealth {
    pub status: DatabaseStatus,
}

/// HealthReport
///
/// Payload of `GET /api/health`. Store failures are reported here as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HealthReport {
    pub server: String,
    pub database: DatabaseHealth,
    pub model: String,
}

/// ClockResponse
///
/// Payload of `GET /`: the current date in the configured local zone plus the wall
/// clock time in both that zone and UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ClockResponse {
    pub date: String,
    pub time_local: String,
    pub time_utc: String,
    pub timezone: String,
}

/// ErrorBody
///
/// Uniform error envelope. `detail` is a stable, machine-checkable reason string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    pub detail: String,
}
