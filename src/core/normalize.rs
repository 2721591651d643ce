//! Formatting removal and length classification for raw identifier input.

use super::types::IdentifierKind;

/// Keep only the ASCII digits of `raw`.
///
/// Dots, slashes, dashes and whitespace from display masks all disappear.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Guess the identifier kind from the digit count of `raw`.
///
/// Useful for form fields that accept either a CPF or a CNPJ.
pub fn detect_kind(raw: &str) -> Option<IdentifierKind> {
    IdentifierKind::from_digit_count(digits_only(raw).len())
}
