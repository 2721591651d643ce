//! Modulo-11 check digits for CPF and CNPJ.
//!
//! Both formats append two check digits computed from weighted digit sums.
//! For a remainder `r = sum % 11` the check digit is `0` when `r < 2`,
//! otherwise `11 - r`.

use super::types::{IdentifierKind, TaxIdentifier};

const CPF_FIRST_WEIGHTS: [u32; 9] = [10, 9, 8, 7, 6, 5, 4, 3, 2];
const CPF_SECOND_WEIGHTS: [u32; 10] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

fn weights(kind: IdentifierKind) -> (&'static [u32], &'static [u32]) {
    match kind {
        IdentifierKind::Individual => (&CPF_FIRST_WEIGHTS, &CPF_SECOND_WEIGHTS),
        IdentifierKind::Organization => (&CNPJ_FIRST_WEIGHTS, &CNPJ_SECOND_WEIGHTS),
    }
}

fn check_digit(digits: &[u8], weights: &[u32]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(&d, &w)| u32::from(d) * w)
        .sum();
    let r = sum % 11;
    if r < 2 { 0 } else { (11 - r) as u8 }
}

fn to_digit_values(s: &str) -> Option<Vec<u8>> {
    s.bytes()
        .map(|b| b.is_ascii_digit().then(|| b - b'0'))
        .collect()
}

/// Verify the check digits of a parsed identifier.
///
/// Never panics. Returns `false` for repeated-digit sequences such as
/// `00000000000` even though their check digits happen to add up.
pub fn verify(identifier: &TaxIdentifier) -> bool {
    verify_digits(identifier.digits(), identifier.kind())
}

/// Verify the check digits of a bare digit string of the given kind.
///
/// Returns `false` on a length mismatch or any non-digit character.
pub fn verify_digits(digits: &str, kind: IdentifierKind) -> bool {
    if digits.len() != kind.digit_count() {
        return false;
    }
    let Some(values) = to_digit_values(digits) else {
        return false;
    };
    if values.iter().all(|&d| d == values[0]) {
        return false;
    }

    let n = values.len();
    let (first, second) = weights(kind);
    check_digit(&values[..n - 2], first) == values[n - 2]
        && check_digit(&values[..n - 1], second) == values[n - 1]
}

/// Compute both check digits for a base of 9 (CPF) or 12 (CNPJ) digits.
///
/// Returns `None` if `base` has the wrong length or contains non-digits.
pub fn compute_check_digits(base: &str, kind: IdentifierKind) -> Option<[u8; 2]> {
    if base.len() != kind.digit_count() - 2 {
        return None;
    }
    let mut values = to_digit_values(base)?;
    let (first, second) = weights(kind);
    let d1 = check_digit(&values, first);
    values.push(d1);
    let d2 = check_digit(&values, second);
    Some([d1, d2])
}
