//! Tax identifiers, normalization, check digits and the error taxonomy.
//!
//! Everything here is pure and synchronous; no I/O happens in this module.

mod checksum;
mod error;
mod normalize;
mod types;

pub use checksum::{compute_check_digits, verify, verify_digits};
pub use error::*;
pub use normalize::{detect_kind, digits_only};
pub use types::*;
