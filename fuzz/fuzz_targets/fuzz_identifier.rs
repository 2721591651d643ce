#![no_main]

use conferir::{IdentifierKind, TaxIdentifier, detect_kind, verify, verify_digits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Invalid input is fine; panics are bugs.
        let _ = detect_kind(s);
        for kind in [IdentifierKind::Individual, IdentifierKind::Organization] {
            let _ = verify_digits(s, kind);
            if let Ok(id) = TaxIdentifier::parse(s, kind) {
                let _ = verify(&id);
                let _ = id.masked();
            }
        }
    }
});
