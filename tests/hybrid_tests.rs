#![cfg(feature = "hybrid")]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use conferir::hybrid::*;
use conferir::{ErrorKind, IdentifierKind};
use tokio::sync::oneshot;
use tokio::time::Instant;

const CNPJ: &str = "11.222.333/0001-81";
const CPF: &str = "111.444.777-35";

// ---------------------------------------------------------------------------
// Fake registries
// ---------------------------------------------------------------------------

/// Answers immediately with a fixed response.
struct FixedRegistry {
    answer: Result<RegistryLookup, RegistryError>,
    calls: AtomicUsize,
    last_deadline: Mutex<Option<Instant>>,
}

impl FixedRegistry {
    fn new(answer: Result<RegistryLookup, RegistryError>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
            last_deadline: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistryClient for FixedRegistry {
    async fn lookup(&self, cnpj: &str, deadline: Instant) -> Result<RegistryLookup, RegistryError> {
        assert_eq!(cnpj, "11222333000181");
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_deadline.lock().unwrap() = Some(deadline);
        self.answer.clone()
    }
}

/// Ignores the deadline and answers after `delay`.
struct SlowRegistry {
    delay: Duration,
}

#[async_trait]
impl RegistryClient for SlowRegistry {
    async fn lookup(&self, _cnpj: &str, _deadline: Instant) -> Result<RegistryLookup, RegistryError> {
        tokio::time::sleep(self.delay).await;
        Ok(RegistryLookup::found(true, acme()))
    }
}

/// Honors the deadline by failing when it passes.
struct TimingOutRegistry;

#[async_trait]
impl RegistryClient for TimingOutRegistry {
    async fn lookup(&self, _cnpj: &str, deadline: Instant) -> Result<RegistryLookup, RegistryError> {
        tokio::time::sleep_until(deadline).await;
        Err(RegistryError::DeadlineExceeded)
    }
}

/// Elapsed time matches `expected` up to timer granularity.
fn assert_within(elapsed: Duration, expected: Duration) {
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(5),
        "elapsed {elapsed:?}, expected {expected:?}"
    );
}

fn acme() -> RegistryRecord {
    RegistryRecord {
        legal_name: Some("ACME COMERCIO LTDA".into()),
        status: Some("ATIVA".into()),
        city: Some("SAO PAULO".into()),
        state: Some("SP".into()),
        ..RegistryRecord::default()
    }
}

// ---------------------------------------------------------------------------
// Local outcomes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn truncated_cnpj_is_format_error_without_call() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::found(true, acme())));
    let validator = HybridValidator::new(registry.clone());

    let r = validator
        .validate("1122233300018", IdentifierKind::Organization, Duration::from_secs(1))
        .await;

    assert!(!r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Local);
    assert_eq!(r.error(), Some(ErrorKind::FormatError));
    assert_eq!(registry.calls(), 0);
}

#[tokio::test]
async fn bad_check_digit_is_checksum_error_without_call() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::found(true, acme())));
    let validator = HybridValidator::new(registry.clone());

    let r = validator
        .validate("11.222.333/0001-82", IdentifierKind::Organization, Duration::from_secs(1))
        .await;

    assert!(!r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Local);
    assert_eq!(r.error(), Some(ErrorKind::ChecksumError));
    assert_eq!(registry.calls(), 0);
}

#[tokio::test]
async fn repeated_digits_is_checksum_error() {
    let r = HybridValidator::local_only()
        .validate("111.111.111-11", IdentifierKind::Individual, Duration::from_secs(1))
        .await;
    assert_eq!(r.error(), Some(ErrorKind::ChecksumError));
}

#[tokio::test]
async fn cpf_is_local_even_with_registry() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::not_found()));
    let validator = HybridValidator::new(registry.clone());

    let r = validator
        .validate(CPF, IdentifierKind::Individual, Duration::from_secs(1))
        .await;

    assert!(r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Local);
    assert_eq!(r.error(), None);
    assert_eq!(r.status(), DocumentStatus::ValidLocal);
    assert_eq!(registry.calls(), 0);
}

#[tokio::test]
async fn cnpj_without_registry_falls_back_to_hybrid() {
    let validator = HybridValidator::local_only();
    assert!(!validator.has_registry());

    let r = validator
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_secs(1))
        .await;

    assert!(r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Hybrid);
    assert_eq!(r.error(), Some(ErrorKind::RemoteUnavailable));
    assert_eq!(r.active_status(), None);
}

// ---------------------------------------------------------------------------
// Registry outcomes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registry_confirms_active_company() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::found(true, acme())));
    let validator = HybridValidator::new(registry.clone());

    let r = validator
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_secs(1))
        .await;

    assert!(r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Remote);
    assert_eq!(r.active_status(), Some(true));
    assert_eq!(r.error(), None);
    assert_eq!(r.registry_data(), Some(&acme()));
    assert_eq!(r.status(), DocumentStatus::ValidActive);
    assert_eq!(registry.calls(), 1);
}

#[tokio::test]
async fn registry_reports_inactive_company() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::found(false, RegistryRecord::default())));
    let r = HybridValidator::new(registry)
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_secs(1))
        .await;

    assert!(r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Remote);
    assert_eq!(r.active_status(), Some(false));
    assert_eq!(r.status(), DocumentStatus::ValidInactive);
}

#[tokio::test]
async fn registry_not_found_overrides_checksum() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::not_found()));
    let r = HybridValidator::new(registry)
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_secs(1))
        .await;

    assert!(!r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Remote);
    assert_eq!(r.error(), Some(ErrorKind::RemoteRejected));
    assert!(r.error().unwrap().is_fatal());
    assert_eq!(r.registry_data(), None);
}

#[tokio::test]
async fn registry_error_falls_back_to_hybrid() {
    for err in [
        RegistryError::Network("connection refused".into()),
        RegistryError::Api("HTTP 503".into()),
        RegistryError::Parse("expected value".into()),
        RegistryError::DeadlineExceeded,
    ] {
        let r = HybridValidator::new(FixedRegistry::new(Err(err)))
            .validate(CNPJ, IdentifierKind::Organization, Duration::from_secs(1))
            .await;
        assert!(r.valid());
        assert_eq!(r.trust_tier(), TrustTier::Hybrid);
        assert_eq!(r.error(), Some(ErrorKind::RemoteUnavailable));
        assert_eq!(r.status(), DocumentStatus::ValidConfirmationPending);
    }
}

#[tokio::test(start_paused = true)]
async fn registry_receives_absolute_deadline() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::found(true, acme())));
    let validator = HybridValidator::new(registry.clone());
    let start = Instant::now();

    validator
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_millis(750))
        .await;

    let deadline = registry.last_deadline.lock().unwrap().unwrap();
    assert_eq!(deadline - start, Duration::from_millis(750));
}

// ---------------------------------------------------------------------------
// Deadlines and cancellation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn slow_registry_is_cut_off_at_deadline() {
    let validator = HybridValidator::new(Arc::new(SlowRegistry {
        delay: Duration::from_secs(60),
    }));
    let deadline = Duration::from_millis(200);
    let start = Instant::now();

    let r = validator
        .validate(CNPJ, IdentifierKind::Organization, deadline)
        .await;

    assert_within(start.elapsed(), deadline);
    assert!(r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Hybrid);
    assert_eq!(r.error(), Some(ErrorKind::RemoteUnavailable));
}

#[tokio::test(start_paused = true)]
async fn timing_out_registry_gives_hybrid() {
    let validator = HybridValidator::new(Arc::new(TimingOutRegistry));
    let r = validator
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_millis(300))
        .await;

    assert!(r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Hybrid);
    assert_eq!(r.error(), Some(ErrorKind::RemoteUnavailable));
}

#[tokio::test]
async fn deadline_holds_in_real_time() {
    let validator = HybridValidator::new(Arc::new(SlowRegistry {
        delay: Duration::from_secs(5),
    }));
    let start = std::time::Instant::now();

    let r = validator
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_millis(50))
        .await;

    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(r.trust_tier(), TrustTier::Hybrid);
}

#[tokio::test(start_paused = true)]
async fn registry_faster_than_deadline_is_remote() {
    let validator = HybridValidator::new(Arc::new(SlowRegistry {
        delay: Duration::from_millis(100),
    }));
    let r = validator
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_secs(2))
        .await;

    assert_eq!(r.trust_tier(), TrustTier::Remote);
    assert_eq!(r.active_status(), Some(true));
}

#[tokio::test(start_paused = true)]
async fn cancel_before_deadline_gives_hybrid() {
    let validator = HybridValidator::new(Arc::new(SlowRegistry {
        delay: Duration::from_secs(60),
    }));
    let start = Instant::now();

    let r = validator
        .validate_with_cancel(
            CNPJ,
            IdentifierKind::Organization,
            Duration::from_secs(5),
            tokio::time::sleep(Duration::from_millis(10)),
        )
        .await;

    assert_within(start.elapsed(), Duration::from_millis(10));
    assert!(r.valid());
    assert_eq!(r.trust_tier(), TrustTier::Hybrid);
    assert_eq!(r.error(), Some(ErrorKind::RemoteUnavailable));
}

#[tokio::test(start_paused = true)]
async fn cancel_through_channel() {
    let validator = HybridValidator::new(Arc::new(SlowRegistry {
        delay: Duration::from_secs(60),
    }));
    let (tx, rx) = oneshot::channel::<()>();

    let cancel = async move {
        let _ = rx.await;
    };
    let (r, ()) = tokio::join!(
        validator.validate_with_cancel(CNPJ, IdentifierKind::Organization, Duration::from_secs(5), cancel),
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let _ = tx.send(());
        }
    );

    assert_eq!(r.trust_tier(), TrustTier::Hybrid);
}

#[tokio::test]
async fn cancel_does_not_affect_local_failures() {
    let r = HybridValidator::local_only()
        .validate_with_cancel(
            "11222333000182",
            IdentifierKind::Organization,
            Duration::from_secs(1),
            std::future::ready(()),
        )
        .await;
    assert_eq!(r.error(), Some(ErrorKind::ChecksumError));
    assert_eq!(r.trust_tier(), TrustTier::Local);
}

#[tokio::test]
async fn already_cancelled_skips_ready_registry_answer() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::found(true, acme())));
    let validator = HybridValidator::new(registry.clone());
    for _ in 0..200 {
        let r = validator
            .validate_with_cancel(
                CNPJ,
                IdentifierKind::Organization,
                Duration::from_secs(1),
                std::future::ready(()),
            )
            .await;
        assert!(r.valid());
        assert_eq!(r.trust_tier(), TrustTier::Hybrid);
        assert_eq!(r.error(), Some(ErrorKind::RemoteUnavailable));
    }
}

// ---------------------------------------------------------------------------
// Idempotence and concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn same_input_same_result() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::found(true, acme())));
    let validator = HybridValidator::new(registry.clone());

    let first = validator
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_secs(1))
        .await;
    let second = validator
        .validate(CNPJ, IdentifierKind::Organization, Duration::from_secs(1))
        .await;

    assert_eq!(first, second);
    assert_eq!(registry.calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_validations_are_independent() {
    let registry = FixedRegistry::new(Ok(RegistryLookup::found(true, acme())));
    let validator = Arc::new(HybridValidator::new(registry.clone()));

    let mut handles = Vec::new();
    for i in 0..16 {
        let validator = Arc::clone(&validator);
        handles.push(tokio::spawn(async move {
            let (raw, kind) = if i % 2 == 0 {
                (CNPJ, IdentifierKind::Organization)
            } else {
                (CPF, IdentifierKind::Individual)
            };
            validator.validate(raw, kind, Duration::from_secs(1)).await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let r = handle.await.unwrap();
        let expected = if i % 2 == 0 { TrustTier::Remote } else { TrustTier::Local };
        assert_eq!(r.trust_tier(), expected);
    }
    assert_eq!(registry.calls(), 8);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_from_json_with_defaults() {
    let config: ValidatorConfig = serde_json::from_str(r#"{"remote_deadline_ms": 1500}"#).unwrap();
    assert_eq!(config.remote_deadline(), Duration::from_millis(1500));
    assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
}

#[tokio::test(start_paused = true)]
async fn validate_default_uses_configured_deadline() {
    let validator = HybridValidator::new(Arc::new(SlowRegistry {
        delay: Duration::from_secs(60),
    }))
    .with_config(ValidatorConfig {
        remote_deadline_ms: 400,
        ..ValidatorConfig::default()
    });
    let start = Instant::now();

    let r = validator
        .validate_default(CNPJ, IdentifierKind::Organization)
        .await;

    assert_within(start.elapsed(), Duration::from_millis(400));
    assert_eq!(r.trust_tier(), TrustTier::Hybrid);
}
