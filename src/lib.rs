//! # conferir
//!
//! Validation of Brazilian tax documents before they enter an invoicing
//! (NF-e) workflow: CPF/CNPJ check digits, optional CNPJ confirmation
//! against a registry with a hard deadline, and NCM/CFOP/CST compatibility.
//!
//! Tax rates use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use conferir::*;
//!
//! let cpf = TaxIdentifier::parse("111.444.777-35", IdentifierKind::Individual).unwrap();
//! assert!(verify(&cpf));
//!
//! assert!(verify_digits("11222333000181", IdentifierKind::Organization));
//! assert!(!verify_digits("11111111111", IdentifierKind::Individual));
//! ```
//!
//! ## Trust tiers
//!
//! [`hybrid::HybridValidator`] reports how its answer was obtained:
//!
//! | Tier | Meaning |
//! |------|---------|
//! | `Local` | check digits only (CPF, or any checksum failure) |
//! | `Remote` | the registry confirmed or rejected the CNPJ |
//! | `Hybrid` | check digits passed, registry unavailable in time |
//!
//! A `Hybrid` result is valid but must be shown as "confirmation pending".
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Identifiers, check digits, fiscal code compatibility |
//! | `hybrid` (default) | Registry-backed validation with deadlines |
//! | `registry` | HTTP registry client (BrasilAPI) |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod fiscal;

#[cfg(feature = "hybrid")]
pub mod hybrid;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
