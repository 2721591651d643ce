use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::IdentifierError;
use super::normalize::digits_only;

/// The two Brazilian taxpayer registration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    /// CPF — 11 digits, natural persons.
    Individual,
    /// CNPJ — 14 digits, legal entities.
    Organization,
}

impl IdentifierKind {
    /// Number of digits an identifier of this kind has, check digits included.
    pub const fn digit_count(self) -> usize {
        match self {
            Self::Individual => 11,
            Self::Organization => 14,
        }
    }

    /// Classify a digit count, if it matches either kind.
    pub const fn from_digit_count(len: usize) -> Option<Self> {
        match len {
            11 => Some(Self::Individual),
            14 => Some(Self::Organization),
            _ => None,
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual => f.write_str("CPF"),
            Self::Organization => f.write_str("CNPJ"),
        }
    }
}

/// A normalized CPF or CNPJ.
///
/// The digit count always matches the kind; the check digits are not
/// verified here (see [`verify`](super::verify)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaxIdentifier {
    digits: String,
    kind: IdentifierKind,
}

impl TaxIdentifier {
    /// Strip formatting from `raw` and check the digit count for `kind`.
    ///
    /// Accepts display formats such as `111.444.777-35` and
    /// `11.222.333/0001-81`.
    pub fn parse(raw: &str, kind: IdentifierKind) -> Result<Self, IdentifierError> {
        let digits = digits_only(raw);
        if digits.len() != kind.digit_count() {
            return Err(IdentifierError {
                value: raw.into(),
                kind,
                expected: kind.digit_count(),
                actual: digits.len(),
            });
        }
        Ok(Self { digits, kind })
    }

    /// The normalized digit string.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Whether this is a CPF or a CNPJ.
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// Identifier with all but the last two digits hidden, for log output.
    pub fn masked(&self) -> String {
        let visible = &self.digits[self.digits.len() - 2..];
        format!("{}{visible}", "*".repeat(self.digits.len() - 2))
    }
}

impl fmt::Display for TaxIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}
