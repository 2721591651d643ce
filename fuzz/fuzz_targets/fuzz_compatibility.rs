#![no_main]

use conferir::fiscal::{FiscalCodes, TaxRates, evaluate_compatibility};
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut parts = s.splitn(5, '|');
        let codes = FiscalCodes {
            ncm: parts.next().map(str::to_string),
            cfop_out: parts.next().map(str::to_string),
            cfop_in: parts.next().map(str::to_string),
            cst: parts.next().map(str::to_string),
        };
        let rates = TaxRates {
            icms: parts.next().and_then(|r| r.parse::<Decimal>().ok()),
            ..TaxRates::default()
        };
        let report = evaluate_compatibility(&codes, &rates);
        assert_eq!(report.valid, report.errors.is_empty());
    }
});
