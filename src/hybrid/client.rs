//! Boundary to an authoritative CNPJ registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;

/// Registration data passed through from the registry.
///
/// Used by callers to pre-fill company forms; never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
    /// Registration status as reported, e.g. "ATIVA" or "BAIXADA".
    pub status: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    /// Two-letter state code (UF).
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub opened_on: Option<String>,
}

/// Answer from a registry that responded in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryLookup {
    pub found: bool,
    pub active: bool,
    pub record: Option<RegistryRecord>,
}

impl RegistryLookup {
    pub fn found(active: bool, record: RegistryRecord) -> Self {
        Self {
            found: true,
            active,
            record: Some(record),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            active: false,
            record: None,
        }
    }
}

/// Failure talking to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The lookup could not finish before the deadline.
    #[error("registry deadline exceeded")]
    DeadlineExceeded,

    /// Connection or transport failure.
    #[error("registry network error: {0}")]
    Network(String),

    /// The registry answered with an error status.
    #[error("registry API error: {0}")]
    Api(String),

    /// The response body did not have the expected shape.
    #[error("registry parse error: {0}")]
    Parse(String),
}

/// An authoritative source for CNPJ registration status.
///
/// Implementations receive the normalized 14-digit CNPJ and must return
/// [`RegistryError::DeadlineExceeded`] rather than block past `deadline`.
/// Any upstream response shape must be mapped into [`RegistryRecord`]
/// inside the implementation.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn lookup(&self, cnpj: &str, deadline: Instant) -> Result<RegistryLookup, RegistryError>;
}
