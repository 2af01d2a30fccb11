use std::collections::HashMap;

use crate::models::Role;

/// RoleResolver
///
/// Immutable `secret -> role` table. Built once from configuration and shared behind
/// an `Arc`; there is no API to change it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleResolver {
    table: HashMap<String, Role>,
}

impl Default for RoleResolver {
    /// The table the service ships with for local development.
    fn default() -> Self {
        Self::from_pairs([
            ("admin123", Role::Admin),
            ("regular123", Role::Regular),
            ("trial123", Role::FreeTrial),
        ])
    }
}

impl RoleResolver {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Role)>,
        S: Into<String>,
    {
        Self {
            table: pairs
                .into_iter()
                .map(|(secret, role)| (secret.into(), role))
                .collect(),
        }
    }

    /// parse
    ///
    /// Reads a table in `secret=role,secret=role` form (the `ROLE_SECRETS` format).
    /// Whitespace around entries is ignored; empty secrets and unknown roles are errors.
    pub fn parse(spec: &str) -> Result<Self, String> {
        let mut table = HashMap::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (secret, role) = entry
                .split_once('=')
                .ok_or_else(|| format!("malformed role secret entry '{}'", entry))?;
            let secret = secret.trim();
            if secret.is_empty() {
                return Err(format!("empty secret in entry '{}'", entry));
            }
            let role: Role = role.trim().parse()?;
            table.insert(secret.to_string(), role);
        }
        if table.is_empty() {
            return Err("role secret table is empty".to_string());
        }
        Ok(Self { table })
    }

    /// Fail-closed lookup: an unknown secret never yields a default role.
    pub fn resolve(&self, secret: &str) -> Option<Role> {
        self.table.get(secret).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
