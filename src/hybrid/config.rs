use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time budget for a registry confirmation.
pub const DEFAULT_REMOTE_DEADLINE: Duration = Duration::from_secs(5);

/// Default registry endpoint (BrasilAPI CNPJ v1).
pub const DEFAULT_REGISTRY_URL: &str = "https://brasilapi.com.br/api/cnpj/v1";

/// Settings for [`HybridValidator`](super::HybridValidator) and the HTTP registry client.
///
/// Deserializes with defaults for any missing field, so a host can embed it
/// in its own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Deadline used by `validate_default`, in milliseconds.
    pub remote_deadline_ms: u64,
    /// Base URL of the CNPJ registry; the CNPJ is appended as a path segment.
    pub registry_url: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            remote_deadline_ms: DEFAULT_REMOTE_DEADLINE.as_millis() as u64,
            registry_url: DEFAULT_REGISTRY_URL.into(),
        }
    }
}

impl ValidatorConfig {
    pub fn remote_deadline(&self) -> Duration {
        Duration::from_millis(self.remote_deadline_ms)
    }
}
