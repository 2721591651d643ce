//! Local checksum plus bounded registry confirmation.
//!
//! A checksum failure always blocks. A registry that is slow, failing or
//! absent never does: the identifier is accepted with the `Hybrid` trust
//! tier. A registry that answers "not found" overrides the checksum.

use std::fmt;
use std::future::{self, Future};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::client::{RegistryClient, RegistryError, RegistryLookup, RegistryRecord};
use super::config::ValidatorConfig;
use crate::core::{ErrorKind, IdentifierKind, TaxIdentifier, verify};

/// How a validation outcome was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustTier {
    /// Checksum only.
    Local,
    /// Confirmed (or rejected) by the registry.
    Remote,
    /// Checksum passed, registry confirmation unavailable.
    Hybrid,
}

/// What a consumer should show for a [`ValidationResult`].
///
/// Keeps "valid, confirmation pending" apart from "valid and active".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Invalid,
    /// CPF with correct check digits.
    ValidLocal,
    ValidActive,
    /// Registered, but the registry reports it as not active.
    ValidInactive,
    ValidConfirmationPending,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "invalid",
            Self::ValidLocal => "valid (check digits only)",
            Self::ValidActive => "valid and active",
            Self::ValidInactive => "valid, registration not active",
            Self::ValidConfirmationPending => "valid, confirmation pending",
        })
    }
}

/// Outcome of [`HybridValidator::validate`]. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    trust_tier: TrustTier,
    active_status: Option<bool>,
    registry_data: Option<RegistryRecord>,
    error: Option<ErrorKind>,
}

impl ValidationResult {
    fn local_failure(error: ErrorKind) -> Self {
        Self {
            valid: false,
            trust_tier: TrustTier::Local,
            active_status: None,
            registry_data: None,
            error: Some(error),
        }
    }

    fn local_success() -> Self {
        Self {
            valid: true,
            trust_tier: TrustTier::Local,
            active_status: None,
            registry_data: None,
            error: None,
        }
    }

    fn remote_unavailable() -> Self {
        Self {
            valid: true,
            trust_tier: TrustTier::Hybrid,
            active_status: None,
            registry_data: None,
            error: Some(ErrorKind::RemoteUnavailable),
        }
    }

    fn confirmed(active: bool, record: Option<RegistryRecord>) -> Self {
        Self {
            valid: true,
            trust_tier: TrustTier::Remote,
            active_status: Some(active),
            registry_data: record,
            error: None,
        }
    }

    fn rejected() -> Self {
        Self {
            valid: false,
            trust_tier: TrustTier::Remote,
            active_status: None,
            registry_data: None,
            error: Some(ErrorKind::RemoteRejected),
        }
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn trust_tier(&self) -> TrustTier {
        self.trust_tier
    }

    /// `None` unless the registry answered.
    pub fn active_status(&self) -> Option<bool> {
        self.active_status
    }

    pub fn registry_data(&self) -> Option<&RegistryRecord> {
        self.registry_data.as_ref()
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.error
    }

    pub fn status(&self) -> DocumentStatus {
        match (self.valid, self.trust_tier, self.active_status) {
            (false, _, _) => DocumentStatus::Invalid,
            (true, TrustTier::Local, _) => DocumentStatus::ValidLocal,
            (true, TrustTier::Hybrid, _) => DocumentStatus::ValidConfirmationPending,
            (true, TrustTier::Remote, Some(false)) => DocumentStatus::ValidInactive,
            (true, TrustTier::Remote, _) => DocumentStatus::ValidActive,
        }
    }
}

/// Validates CPF/CNPJ input, optionally confirming CNPJs with a registry.
///
/// Holds no mutable state; share it freely between tasks.
#[derive(Clone)]
pub struct HybridValidator {
    client: Option<Arc<dyn RegistryClient>>,
    config: ValidatorConfig,
}

impl fmt::Debug for HybridValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridValidator")
            .field("registry", &self.client.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for HybridValidator {
    fn default() -> Self {
        Self::local_only()
    }
}

impl HybridValidator {
    /// Validator that confirms CNPJs with `client`.
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self {
            client: Some(client),
            config: ValidatorConfig::default(),
        }
    }

    /// Validator without a registry. Valid CNPJs come back as `Hybrid`.
    pub fn local_only() -> Self {
        Self {
            client: None,
            config: ValidatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn has_registry(&self) -> bool {
        self.client.is_some()
    }

    /// Validate `raw` as `kind`, waiting at most `deadline` for the registry.
    pub async fn validate(
        &self,
        raw: &str,
        kind: IdentifierKind,
        deadline: Duration,
    ) -> ValidationResult {
        self.validate_with_cancel(raw, kind, deadline, future::pending())
            .await
    }

    /// [`validate`](Self::validate) with the configured default deadline.
    pub async fn validate_default(&self, raw: &str, kind: IdentifierKind) -> ValidationResult {
        self.validate(raw, kind, self.config.remote_deadline()).await
    }

    /// Like [`validate`](Self::validate), but abandons the registry call as
    /// soon as `cancel` completes and returns the `Hybrid` fallback.
    pub async fn validate_with_cancel<F>(
        &self,
        raw: &str,
        kind: IdentifierKind,
        deadline: Duration,
        cancel: F,
    ) -> ValidationResult
    where
        F: Future<Output = ()>,
    {
        let id = match TaxIdentifier::parse(raw, kind) {
            Ok(id) => id,
            Err(e) => {
                debug!(%kind, expected = e.expected, actual = e.actual, "identifier has wrong length");
                return ValidationResult::local_failure(ErrorKind::FormatError);
            }
        };

        if !verify(&id) {
            debug!(%kind, id = %id.masked(), "identifier failed checksum");
            return ValidationResult::local_failure(ErrorKind::ChecksumError);
        }

        if kind == IdentifierKind::Individual {
            return ValidationResult::local_success();
        }

        let Some(client) = &self.client else {
            debug!(id = %id.masked(), "no registry configured, accepting on checksum");
            return ValidationResult::remote_unavailable();
        };

        let now = Instant::now();
        let deadline_at = now
            .checked_add(deadline)
            .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365));
        let lookup = tokio::time::timeout_at(deadline_at, client.lookup(id.digits(), deadline_at));

        // Cancellation wins a tie with a ready lookup.
        let outcome = tokio::select! {
            biased;
            () = cancel => {
                warn!(id = %id.masked(), "registry lookup cancelled, accepting on checksum");
                return ValidationResult::remote_unavailable();
            }
            res = lookup => res.unwrap_or(Err(RegistryError::DeadlineExceeded)),
        };

        reconcile(&id, outcome)
    }
}

fn reconcile(id: &TaxIdentifier, outcome: Result<RegistryLookup, RegistryError>) -> ValidationResult {
    match outcome {
        Ok(lookup) if lookup.found => {
            info!(id = %id.masked(), active = lookup.active, "registry confirmed identifier");
            ValidationResult::confirmed(lookup.active, lookup.record)
        }
        Ok(_) => {
            info!(id = %id.masked(), "registry rejected identifier");
            ValidationResult::rejected()
        }
        Err(e) => {
            warn!(id = %id.masked(), error = %e, "registry unavailable, accepting on checksum");
            ValidationResult::remote_unavailable()
        }
    }
}
