mod fixtures;

use quill_errors::{ErrorCode, QuillError};
use quill_logger::Level;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn succeeds_on_third_attempt_after_backoff() {
    let (engine, log) = fixtures::engine();
    let calls = Arc::new(AtomicU32::new(0));
    let started = Instant::now();

    let result = engine
        .retry(&fixtures::policy(3), "flaky fetch", || {
            let calls = calls.clone();
            async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 | 1 => Err(QuillError::network("connection reset")),
                    _ => Ok("done"),
                }
            }
        })
        .await;

    assert_eq!(result.expect("third attempt succeeds"), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(started.elapsed(), Duration::from_millis(3000));
    assert_eq!(log.count(Level::WARN), 2);
    assert_eq!(log.count(Level::ERROR), 0);
}

#[tokio::test(start_paused = true)]
async fn non_retryable_error_short_circuits_without_delay() {
    let (engine, log) = fixtures::engine();
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let err = engine
        .retry(&fixtures::policy(5), "validate", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(QuillError::validation("title is empty")) }
        })
        .await
        .expect_err("validation errors are permanent");

    assert_eq!(err.code(), ErrorCode::PublishValidationFailed);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);

    let warnings = log.at_level(Level::WARN);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].fields["code"], 2012);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_return_the_last_original_error() {
    let (engine, log) = fixtures::engine();
    let calls = AtomicU32::new(0);

    let err = engine
        .retry(&fixtures::policy(3), "upload", || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err::<(), _>(QuillError::network("timeout").with_context("attempt", attempt)) }
        })
        .await
        .expect_err("every attempt fails");

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(err.code(), ErrorCode::PublishNetwork);
    assert_eq!(err.context()["attempt"], 3);

    let errors = log.at_level(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "All attempts failed");
    let record = errors[0].error.as_ref().expect("taxonomy record attached");
    assert_eq!(record["code"], 2001);
}

#[tokio::test(start_paused = true)]
async fn foreign_errors_are_treated_as_transient() {
    let (engine, _log) = fixtures::engine();
    let calls = AtomicU32::new(0);

    let result: anyhow::Result<u32> = engine
        .retry(&fixtures::policy(4), "foreign", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { if n < 3 { Err(anyhow::anyhow!("socket closed")) } else { Ok(n) } }
        })
        .await;

    assert_eq!(result.expect("fourth attempt succeeds"), 3);
}

#[tokio::test(start_paused = true)]
async fn taxonomy_errors_inside_anyhow_keep_their_retry_flag() {
    let (engine, _log) = fixtures::engine();
    let calls = AtomicU32::new(0);

    let result: anyhow::Result<()> = engine
        .retry(&fixtures::policy(3), "decrypt", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(anyhow::Error::new(QuillError::crypto("decrypt")).context("loading credentials"))
            }
        })
        .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn single_attempt_policy_never_sleeps() {
    let (engine, _log) = fixtures::engine();
    let started = Instant::now();

    let result = engine
        .retry(&fixtures::policy(1), "once", || async { Err::<(), _>(QuillError::network("down")) })
        .await;

    assert!(result.is_err());
    assert_eq!(started.elapsed(), Duration::ZERO);
}
