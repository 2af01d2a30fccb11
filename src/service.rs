use std::sync::Arc;

use crate::{
    error::{AuthError, HashError},
    hasher::{CredentialHasher, MAX_PASSWORD_BYTES},
    models::{LoginRequest, LoginResponse, SignupRequest, SignupResponse},
    repository::UserStoreState,
    roles::RoleResolver,
};

pub const TOKEN_TYPE: &str = "bearer";

/// Placeholder access token. Not signed and not verifiable; clients only echo it back.
pub fn placeholder_token(username: &str) -> String {
    format!("mock_jwt_token_for_{}", username)
}

/// SignupStage
///
/// Progress of a single signup through its checks. Rejection can happen after any
/// stage; the order of the stages is the order of validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStage {
    Start,
    SecretChecked,
    UserChecked,
    PasswordValidated,
    Hashed,
    Persisted,
    Done,
}

/// SignupService
///
/// Orchestrates account creation: role resolution, duplicate detection, password
/// bounds, hashing and persistence. Holds no mutable state, so clones are free to
/// serve concurrent requests.
#[derive(Clone)]
pub struct SignupService {
    roles: Arc<RoleResolver>,
    hasher: CredentialHasher,
    store: UserStoreState,
    master_salt: Arc<str>,
}

impl SignupService {
    pub fn new(
        roles: Arc<RoleResolver>,
        hasher: CredentialHasher,
        store: UserStoreState,
        master_salt: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            roles,
            hasher,
            store,
            master_salt: master_salt.into(),
        }
    }

    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    /// signup
    ///
    /// Checks run strictly in order: secret, then existence, then password length. The
    /// first failing check decides the error, and nothing is written unless all pass.
    /// A duplicate reported by the store at insert time is the same `UserExists`
    /// outcome as the pre-check.
    pub async fn signup(&self, request: SignupRequest) -> Result<SignupResponse, AuthError> {
        let SignupRequest {
            username,
            password,
            secret,
        } = request;
        trace_stage(&username, SignupStage::Start);

        let Some(role) = self.roles.resolve(&secret) else {
            tracing::info!(username = %username, "signup rejected: incorrect secret");
            return Err(AuthError::InvalidSecret);
        };
        trace_stage(&username, SignupStage::SecretChecked);

        if self.store.exists(&username).await? {
            tracing::info!(username = %username, "signup rejected: user already exists");
            return Err(AuthError::UserExists);
        }
        trace_stage(&username, SignupStage::UserChecked);

        if password.len() > MAX_PASSWORD_BYTES {
            tracing::info!(username = %username, bytes = password.len(), "signup rejected: password too long");
            return Err(AuthError::PasswordTooLong);
        }
        trace_stage(&username, SignupStage::PasswordValidated);

        // Argon2 is CPU and memory bound; keep it off the async workers.
        let hasher = self.hasher.clone();
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(HashError::from)??;
        trace_stage(&username, SignupStage::Hashed);

        let record = match self.store.insert(&username, &digest, role).await {
            Ok(record) => record,
            Err(e) => {
                let err = AuthError::from(e);
                if matches!(err, AuthError::UserExists) {
                    tracing::warn!(username = %username, "signup lost insert race: user already exists");
                }
                return Err(err);
            }
        };
        trace_stage(&username, SignupStage::Persisted);

        tracing::info!(username = %record.username, role = %record.role, "user signed up");
        trace_stage(&username, SignupStage::Done);

        Ok(SignupResponse {
            access_token: placeholder_token(&record.username),
            token_type: TOKEN_TYPE.to_string(),
            user: record.sanitized(),
        })
    }

    /// legacy_login
    ///
    /// The pre-signup login flow: the caller proves knowledge of the master salt and a
    /// role secret. The password is accepted but not checked against any stored digest.
    pub async fn legacy_login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        if request.salt != *self.master_salt {
            tracing::info!(username = %request.username, "login rejected: invalid master salt");
            return Err(AuthError::InvalidMasterSalt);
        }

        let role = self.roles.resolve(&request.secret).ok_or_else(|| {
            tracing::info!(username = %request.username, "login rejected: incorrect secret");
            AuthError::InvalidSecret
        })?;

        Ok(LoginResponse {
            access_token: placeholder_token(&request.username),
            token_type: TOKEN_TYPE.to_string(),
            role,
            username: request.username,
        })
    }
}

fn trace_stage(username: &str, stage: SignupStage) {
    tracing::debug!(username = %username, stage = ?stage, "signup stage");
}
