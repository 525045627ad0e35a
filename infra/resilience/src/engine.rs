use crate::backoff::Backoff;
use quill_domain::config::RetryPolicy;
use quill_errors::{AsQuillError, ErrorCode, QuillError};
use quill_logger::{EventLog, fields};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Retry, timeout and fallback combinators.
///
/// Cloning is cheap; every clone logs through the same injected [`EventLog`].
#[derive(Debug, Clone)]
pub struct Resilience {
    log: Arc<dyn EventLog>,
}

impl Resilience {
    #[must_use]
    pub fn new(log: Arc<dyn EventLog>) -> Self {
        Self { log }
    }

    /// Runs `operation` until it succeeds, fails permanently or the policy runs out of
    /// attempts.
    ///
    /// A taxonomy error with `retryable == false` stops the loop immediately, without
    /// sleeping. Errors that carry no taxonomy information are treated as transient.
    ///
    /// # Errors
    /// The error of the last attempt, unchanged.
    pub async fn retry<T, E, F, Fut>(
        &self,
        policy: &RetryPolicy,
        label: &str,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: AsQuillError + Display,
    {
        let max_attempts = policy.max_attempts.get();
        let mut delays = Backoff::new(policy);
        let mut attempt = 1_u32;

        loop {
            self.log.debug(
                "Attempt started",
                &fields! { "label" => label, "attempt" => attempt, "maxAttempts" => max_attempts },
            );

            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if let Some(typed) = err.as_quill_error()
                && !typed.retryable()
            {
                self.log.warn(
                    "Error is not retryable",
                    &fields! { "label" => label, "attempt" => attempt, "code" => typed.code().as_u16() },
                );
                return Err(err);
            }

            let Some(delay) = delays.next() else {
                self.log.error(
                    "All attempts failed",
                    err.as_quill_error(),
                    &fields! { "label" => label, "attempts" => max_attempts, "error" => err.to_string() },
                );
                return Err(err);
            };

            self.log.warn(
                "Attempt failed, retrying",
                &fields! {
                    "label" => label,
                    "attempt" => attempt,
                    "nextDelayMs" => millis(delay),
                    "error" => err.to_string(),
                },
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Races `operation` against `timeout`.
    ///
    /// The operation runs as its own task. When the timer wins, the caller gets a
    /// [`QuillError::timeout`] and the task keeps running detached; its eventual result
    /// is dropped. A panic inside the operation is resumed on the caller.
    ///
    /// # Errors
    /// The operation's own error, or the timeout error converted into `E`.
    pub async fn with_timeout<T, E, Fut>(
        &self,
        operation: Fut,
        timeout: Duration,
        label: &str,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: From<QuillError> + Send + 'static,
    {
        self.race(tokio::spawn(operation), timeout, label, None).await
    }

    /// Like [`with_timeout`](Self::with_timeout), but hands the operation a
    /// [`CancellationToken`] that is cancelled when the timer wins, so cooperative
    /// operations can stop early.
    ///
    /// # Errors
    /// The operation's own error, or the timeout error converted into `E`.
    pub async fn with_timeout_cancellable<T, E, F, Fut>(
        &self,
        operation: F,
        timeout: Duration,
        label: &str,
    ) -> Result<T, E>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: From<QuillError> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(operation(token.child_token()));
        self.race(handle, timeout, label, Some(token)).await
    }

    async fn race<T, E>(
        &self,
        mut handle: JoinHandle<Result<T, E>>,
        timeout: Duration,
        label: &str,
        token: Option<CancellationToken>,
    ) -> Result<T, E>
    where
        E: From<QuillError>,
    {
        tokio::select! {
            joined = &mut handle => match joined {
                Ok(result) => result,
                Err(join) if join.is_panic() => std::panic::resume_unwind(join.into_panic()),
                Err(join) => Err(QuillError::system(ErrorCode::SystemUnknown)
                    .with_message(format!("{label} was aborted before completing"))
                    .with_context("label", label)
                    .with_cause(join)
                    .into()),
            },
            () = tokio::time::sleep(timeout) => {
                if let Some(token) = token {
                    token.cancel();
                }
                let err = QuillError::timeout(label, timeout);
                self.log.error("Operation timed out", Some(&err), &fields! { "label" => label });
                Err(err.into())
            }
        }
    }

    /// Awaits `operation`; on failure logs one warning and returns `fallback`.
    pub async fn safe<T, E, Fut>(&self, operation: Fut, fallback: T, label: &str) -> T
    where
        Fut: Future<Output = Result<T, E>>,
        E: AsQuillError + Display,
    {
        match operation.await {
            Ok(value) => value,
            Err(err) => {
                let code = err.as_quill_error().map(|typed| typed.code().as_u16());
                self.log.warn(
                    "Returning fallback value due to error",
                    &fields! { "label" => label, "error" => err.to_string(), "code" => code },
                );
                fallback
            },
        }
    }

    /// Logs `error` at error level, attaching the taxonomy record when there is one.
    pub fn report<E>(&self, error: &E, label: &str)
    where
        E: AsQuillError + Display + ?Sized,
    {
        match error.as_quill_error() {
            Some(typed) => self.log.error(
                &format!("[{label}] {}", typed.kind()),
                Some(typed),
                typed.context(),
            ),
            None => self.log.error(
                &format!("[{label}] {error}"),
                None,
                &fields! { "label" => label },
            ),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
