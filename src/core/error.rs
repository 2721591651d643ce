use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::IdentifierKind;

/// Outcome classification shared by identifier validation and the
/// fiscal code compatibility report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Wrong digit count after normalization.
    #[error("identifier has the wrong number of digits")]
    FormatError,

    /// Check digits do not match, or the digits are a known-invalid sequence.
    #[error("identifier check digits do not match")]
    ChecksumError,

    /// The registry timed out, failed, was cancelled or is not configured.
    #[error("registry confirmation unavailable")]
    RemoteUnavailable,

    /// The registry answered and explicitly did not find the identifier.
    #[error("registry rejected the identifier")]
    RemoteRejected,

    /// One or more fiscal code rules failed.
    #[error("fiscal codes are not compatible")]
    CompatibilityError,
}

impl ErrorKind {
    /// Whether this outcome must block the document.
    ///
    /// `RemoteUnavailable` is the only non-fatal kind: the identifier is
    /// still accepted, with a downgraded trust tier.
    pub fn is_fatal(self) -> bool {
        !matches!(self, Self::RemoteUnavailable)
    }
}

/// Error returned when a raw string cannot become a [`TaxIdentifier`](super::TaxIdentifier).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} identifier '{value}': expected {expected} digits, got {actual}")]
pub struct IdentifierError {
    /// The raw input value.
    pub value: String,
    /// Kind the caller asked for.
    pub kind: IdentifierKind,
    /// Digit count required by the kind.
    pub expected: usize,
    /// Digit count found after stripping formatting.
    pub actual: usize,
}

impl IdentifierError {
    /// The taxonomy entry for this error (always [`ErrorKind::FormatError`]).
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::FormatError
    }
}

/// Error returned when an NCM, CFOP or CST/CSOSN code is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CodeFormatError {
    /// NCM must have exactly 8 digits.
    #[error("NCM '{0}' must have exactly 8 digits")]
    Ncm(String),

    /// CFOP must have exactly 4 digits.
    #[error("CFOP '{0}' must have exactly 4 digits")]
    Cfop(String),

    /// CST has 2 digits, CSOSN has 3.
    #[error("CST/CSOSN '{0}' must have 2 or 3 digits")]
    SituationCode(String),
}
