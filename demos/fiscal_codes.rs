use conferir::fiscal::*;
use rust_decimal_macros::dec;

fn main() {
    println!("=== NCM / CFOP / CST Compatibility ===\n");

    let cases = [
        ("Domestic sale", FiscalCodes::new("8471.30.12", "5102", "1102", "00"), dec!(18)),
        ("Purchase CFOP as exit", FiscalCodes::new("84713012", "1102", "1102", "00"), dec!(18)),
        ("Simples Nacional", FiscalCodes::new("22030000", "5405", "1403", "500"), dec!(0)),
        ("Malformed NCM", FiscalCodes::new("8471", "5102", "1102", "00"), dec!(18)),
        ("High ICMS", FiscalCodes::new("22030000", "5102", "1102", "00"), dec!(30)),
    ];

    for (label, codes, icms) in &cases {
        let report = evaluate_compatibility(codes, &TaxRates::icms(*icms));
        println!("  {label}: valid={}", report.valid);
        println!(
            "    NCM×CFOP={} CFOP×CST={} CST×NCM={}",
            report.pairs.ncm_cfop, report.pairs.cfop_cst, report.pairs.cst_ncm
        );
        for e in &report.errors {
            println!("    error: {e}");
        }
        for w in &report.warnings {
            println!("    warning: {w}");
        }
        for s in &report.suggestions {
            println!("    suggestion: {s}");
        }
    }

    println!("\n=== Catalog search: CFOP \"venda\" ===\n");
    let catalog = StaticCatalog::default();
    for entry in catalog.search(CodeKind::Cfop, "venda") {
        println!("  {} — {}", entry.code, entry.description);
    }
}
