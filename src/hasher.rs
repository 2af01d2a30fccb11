use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::HashError;

/// Hard input bound for stored passwords, in bytes. Longer inputs are rejected before
/// hashing so every client sees the same limit regardless of backend.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// HashCost
///
/// Argon2 work factors. Embedded in every digest, so changing them only affects
/// newly created users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    /// Cheapest parameters Argon2 accepts. Test and local scaffolding only.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

/// CredentialHasher
///
/// Argon2id password hashing with a fresh OS-random salt per call. Cheap to clone, so
/// callers can move a copy onto the blocking pool.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new(cost: HashCost) -> Result<Self, HashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(HashError::Params)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// hash
    ///
    /// Produces a PHC string (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`). Two calls
    /// with the same input never return the same digest.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(HashError::Hash)?;
        Ok(digest.to_string())
    }

    /// verify
    ///
    /// Uses the parameters embedded in `digest`, not this hasher's cost. A digest that
    /// does not parse is a verification failure, never an error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("malformed digest rejected: {}", e);
                return false;
            }
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
