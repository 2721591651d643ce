use std::time::Duration;

use conferir::IdentifierKind;
use conferir::hybrid::*;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "registry")]
fn validator() -> HybridValidator {
    match BrasilApiClient::new() {
        Ok(client) => HybridValidator::new(std::sync::Arc::new(client)),
        Err(e) => {
            eprintln!("registry client unavailable ({e}), using check digits only");
            HybridValidator::local_only()
        }
    }
}

#[cfg(not(feature = "registry"))]
fn validator() -> HybridValidator {
    HybridValidator::local_only()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let validator = validator();
    println!("=== CPF / CNPJ Validation (registry: {}) ===\n", validator.has_registry());

    let inputs = [
        ("111.444.777-35", IdentifierKind::Individual),
        ("111.111.111-11", IdentifierKind::Individual), // repeated digits
        ("11.222.333/0001-81", IdentifierKind::Organization),
        ("11.222.333/0001-82", IdentifierKind::Organization), // bad check digit
        ("11.222.333/0001-8", IdentifierKind::Organization),  // truncated
    ];

    for (raw, kind) in inputs {
        let result = validator.validate(raw, kind, Duration::from_secs(3)).await;
        println!("  {kind} {raw}");
        println!(
            "    status={}, tier={:?}, error={}",
            result.status(),
            result.trust_tier(),
            result.error().map_or_else(|| "—".to_string(), |e| e.to_string())
        );
        if let Some(record) = result.registry_data() {
            println!(
                "    {} ({}/{})",
                record.legal_name.as_deref().unwrap_or("—"),
                record.city.as_deref().unwrap_or("—"),
                record.state.as_deref().unwrap_or("—")
            );
        }
    }
}
