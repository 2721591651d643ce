//! NCM / CFOP / CST compatibility checks for product fiscal data.
//!
//! # Example
//!
//! ```rust
//! use conferir::fiscal::*;
//! use rust_decimal_macros::dec;
//!
//! let codes = FiscalCodes::new("84713012", "5102", "1102", "00");
//! let report = evaluate_compatibility(&codes, &TaxRates::icms(dec!(18)));
//! assert!(report.valid);
//! assert!(report.pairs.all());
//! ```

mod catalog;
mod codes;
mod compatibility;
mod rules;

pub use catalog::{CatalogEntry, CodeKind, FiscalCodeCatalog, StaticCatalog};
pub use codes::{Cfop, CfopDirection, CfopScope, Ncm, SituationCode, TaxRegime, TaxType};
pub use compatibility::{
    CompatibilityConfig, CompatibilityEngine, CompatibilityReport, DEFAULT_ICMS_REVIEW_RATE,
    DEFAULT_IPI_REVIEW_RATE, FiscalCodes, PairCompatibility, REQUIRED_FIELDS_MISSING, TaxRates,
    evaluate_compatibility,
};
pub use rules::{CfopCstRule, CodePattern, CompatibilityTable, CstNcmRule, Verdict};
