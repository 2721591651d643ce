use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::codes::{Cfop, Ncm, SituationCode, TaxType};
use super::rules::{CompatibilityTable, Verdict};
use crate::core::{CodeFormatError, ErrorKind};

/// Error message used when the precondition check fails.
pub const REQUIRED_FIELDS_MISSING: &str = "required fields missing";

/// ICMS rates above this are flagged for review (percent).
pub const DEFAULT_ICMS_REVIEW_RATE: Decimal = dec!(25);

/// IPI rates above this are flagged for review (percent).
pub const DEFAULT_IPI_REVIEW_RATE: Decimal = dec!(50);

/// The fiscal codes attached to a product, as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalCodes {
    pub ncm: Option<String>,
    /// CFOP used when the product leaves (sale).
    pub cfop_out: Option<String>,
    /// CFOP used when the product comes in (purchase).
    pub cfop_in: Option<String>,
    /// ICMS CST or CSOSN.
    pub cst: Option<String>,
}

impl FiscalCodes {
    pub fn new(
        ncm: impl Into<String>,
        cfop_out: impl Into<String>,
        cfop_in: impl Into<String>,
        cst: impl Into<String>,
    ) -> Self {
        Self {
            ncm: Some(ncm.into()),
            cfop_out: Some(cfop_out.into()),
            cfop_in: Some(cfop_in.into()),
            cst: Some(cst.into()),
        }
    }
}

/// Tax rates in percent. ICMS is required, the rest are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRates {
    pub icms: Option<Decimal>,
    pub ipi: Option<Decimal>,
    pub pis: Option<Decimal>,
    pub cofins: Option<Decimal>,
}

impl TaxRates {
    pub fn icms(rate: Decimal) -> Self {
        Self {
            icms: Some(rate),
            ..Self::default()
        }
    }
}

/// Outcome of each pairwise rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCompatibility {
    pub ncm_cfop: bool,
    pub cfop_cst: bool,
    pub cst_ncm: bool,
}

impl PairCompatibility {
    pub fn all(&self) -> bool {
        self.ncm_cfop && self.cfop_cst && self.cst_ncm
    }
}

/// Diagnostic report for one set of fiscal codes.
///
/// `errors` block the product; `warnings` and `suggestions` never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub pairs: PairCompatibility,
}

impl CompatibilityReport {
    fn missing_fields() -> Self {
        Self {
            valid: false,
            errors: vec![REQUIRED_FIELDS_MISSING.into()],
            warnings: Vec::new(),
            suggestions: Vec::new(),
            pairs: PairCompatibility::default(),
        }
    }

    /// [`ErrorKind::CompatibilityError`] when the report is not valid.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        (!self.valid).then_some(ErrorKind::CompatibilityError)
    }
}

/// Thresholds and rule table for [`CompatibilityEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityConfig {
    pub icms_review_rate: Decimal,
    pub ipi_review_rate: Decimal,
    pub table: CompatibilityTable,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        Self {
            icms_review_rate: DEFAULT_ICMS_REVIEW_RATE,
            ipi_review_rate: DEFAULT_IPI_REVIEW_RATE,
            table: CompatibilityTable::default(),
        }
    }
}

/// Cross-validates NCM, CFOP and CST codes.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityEngine {
    config: CompatibilityConfig,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn record_format<T>(parsed: Result<T, CodeFormatError>, errors: &mut Vec<String>) -> Option<T> {
    parsed.map_err(|e| errors.push(e.to_string())).ok()
}

impl CompatibilityEngine {
    pub fn new(config: CompatibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompatibilityConfig {
        &self.config
    }

    /// Evaluate every rule and collect all problems, not just the first.
    ///
    /// Errors come out in a fixed order: NCM format, CFOP-out format,
    /// CFOP-in format, CST format, then the NCM×CFOP, CFOP×CST and
    /// CST×NCM pairs, then rate errors.
    pub fn evaluate(&self, codes: &FiscalCodes, rates: &TaxRates) -> CompatibilityReport {
        let (Some(ncm), Some(cfop_out), Some(cfop_in), Some(cst), Some(icms)) = (
            present(&codes.ncm),
            present(&codes.cfop_out),
            present(&codes.cfop_in),
            present(&codes.cst),
            rates.icms,
        ) else {
            debug!("fiscal codes rejected: required fields missing");
            return CompatibilityReport::missing_fields();
        };

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut suggestions = Vec::new();

        let ncm = record_format(Ncm::parse(ncm), &mut errors);
        let cfop_out = record_format(Cfop::parse(cfop_out), &mut errors);
        let cfop_in = record_format(Cfop::parse(cfop_in), &mut errors);
        let cst = record_format(SituationCode::parse(TaxType::Icms, cst), &mut errors);

        if let Some(cfop_in) = &cfop_in {
            if !cfop_in.is_entry() {
                warnings.push(format!(
                    "entry CFOP {cfop_in} does not start with 1, 2 or 3"
                ));
            }
        }

        let table = &self.config.table;
        let mut pairs = PairCompatibility::default();

        if let (Some(ncm), Some(out)) = (&ncm, &cfop_out) {
            pairs.ncm_cfop = out.is_exit();
            if !pairs.ncm_cfop {
                errors.push(format!(
                    "NCM {ncm} requires an exit CFOP (5xxx, 6xxx or 7xxx), got {out}"
                ));
            }
        }

        if let (Some(out), Some(cst)) = (&cfop_out, &cst) {
            pairs.cfop_cst = match table.cfop_cst(out, cst) {
                Verdict::Compatible => true,
                Verdict::Incompatible => {
                    errors.push(format!("CFOP {out} is not compatible with CST {cst}"));
                    false
                }
                Verdict::NoRule => {
                    warnings.push(format!(
                        "no compatibility rule for CST {cst} with CFOP {out}, verify manually"
                    ));
                    true
                }
            };
        }

        if let (Some(cst), Some(ncm)) = (&cst, &ncm) {
            pairs.cst_ncm = match table.cst_ncm(cst, ncm) {
                Verdict::Compatible => true,
                Verdict::Incompatible => {
                    errors.push(format!("CST {cst} is not compatible with NCM {ncm}"));
                    false
                }
                Verdict::NoRule => {
                    warnings.push(format!(
                        "no compatibility rule for CST {cst} with NCM {ncm}, verify manually"
                    ));
                    true
                }
            };
        }

        let named_rates = [
            ("ICMS", Some(icms)),
            ("IPI", rates.ipi),
            ("PIS", rates.pis),
            ("COFINS", rates.cofins),
        ];
        for (name, rate) in named_rates {
            if let Some(rate) = rate {
                if rate < Decimal::ZERO {
                    errors.push(format!("{name} rate {rate}% must not be negative"));
                }
            }
        }

        if icms > self.config.icms_review_rate {
            suggestions.push(format!("ICMS rate {icms}% is unusually high, verify"));
        }
        if let Some(ipi) = rates.ipi {
            if ipi > self.config.ipi_review_rate {
                suggestions.push(format!("IPI rate {ipi}% is unusually high, verify"));
            }
        }

        let valid = errors.is_empty();
        debug!(
            valid,
            errors = errors.len(),
            warnings = warnings.len(),
            "fiscal codes evaluated"
        );

        CompatibilityReport {
            valid,
            errors,
            warnings,
            suggestions,
            pairs,
        }
    }
}

/// Evaluate fiscal codes with the built-in rule table and thresholds.
pub fn evaluate_compatibility(codes: &FiscalCodes, rates: &TaxRates) -> CompatibilityReport {
    CompatibilityEngine::default().evaluate(codes, rates)
}
