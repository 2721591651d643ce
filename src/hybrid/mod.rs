//! CPF/CNPJ validation with optional registry confirmation.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use conferir::IdentifierKind;
//! use conferir::hybrid::*;
//!
//! let validator = HybridValidator::new(Arc::new(BrasilApiClient::new()?));
//! let result = validator
//!     .validate("11.222.333/0001-81", IdentifierKind::Organization, Duration::from_secs(3))
//!     .await;
//!
//! match result.trust_tier() {
//!     TrustTier::Remote => println!("{}", result.status()),
//!     TrustTier::Hybrid => println!("valid, confirmation pending"),
//!     TrustTier::Local => println!("checksum result only"),
//! }
//! ```

mod client;
mod config;
mod orchestrator;

#[cfg(feature = "registry")]
mod brasilapi;

pub use client::{RegistryClient, RegistryError, RegistryLookup, RegistryRecord};
pub use config::{DEFAULT_REGISTRY_URL, DEFAULT_REMOTE_DEADLINE, ValidatorConfig};
pub use orchestrator::{DocumentStatus, HybridValidator, TrustTier, ValidationResult};

#[cfg(feature = "registry")]
pub use brasilapi::BrasilApiClient;
