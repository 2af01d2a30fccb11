use std::time::Duration;

use crate::{
    models::{DatabaseHealth, DatabaseStatus, HealthReport},
    repository::UserStoreState,
};

pub const SERVER_ONLINE: &str = "online";

/// HealthReporter
///
/// Turns store reachability into a status payload. The probe runs under its own
/// timeout, so a store that hangs is reported as down rather than stalling the caller.
#[derive(Clone)]
pub struct HealthReporter {
    store: UserStoreState,
    probe_timeout: Duration,
    model_name: String,
}

impl HealthReporter {
    pub fn new(store: UserStoreState, probe_timeout: Duration, model_name: impl Into<String>) -> Self {
        Self {
            store,
            probe_timeout,
            model_name: model_name.into(),
        }
    }

    /// report
    ///
    /// Never fails: an unreachable or slow store becomes `status: "down"`.
    pub async fn report(&self) -> HealthReport {
        let reachable = tokio::time::timeout(self.probe_timeout, self.store.ping())
            .await
            .unwrap_or_else(|_| {
                tracing::warn!("health probe timed out after {:?}", self.probe_timeout);
                false
            });

        let status = if reachable {
            DatabaseStatus::Healthy
        } else {
            DatabaseStatus::Down
        };

        HealthReport {
            server: SERVER_ONLINE.to_string(),
            database: DatabaseHealth { status },
            model: self.model_name.clone(),
        }
    }
}
