use crate::Fields;
use crate::code::{ErrorCode, ErrorDomain};
use crate::kind::ErrorKind;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::path::Path;
use std::time::Duration;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A classified failure.
///
/// `QuillError` is a pure value carrier: building one never fails and never performs
/// I/O. The only behavioural field is [`retryable`](Self::retryable), which the
/// resilience engine consults to decide whether another attempt is worth making.
#[derive(Debug, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct QuillError {
    kind: ErrorKind,
    code: ErrorCode,
    message: Cow<'static, str>,
    context: Fields,
    retryable: bool,
    timestamp: DateTime<Utc>,
    #[source]
    cause: Option<BoxError>,
}

impl QuillError {
    /// Creates an error for `code` with the code's default message and kind.
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self::of_kind(ErrorKind::for_code(code), code)
    }

    fn of_kind(kind: ErrorKind, code: ErrorCode) -> Self {
        Self {
            kind,
            code,
            message: Cow::Borrowed(code.default_message()),
            context: Fields::new(),
            retryable: kind.default_retryable(),
            timestamp: Utc::now(),
            cause: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_cause(self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.with_boxed_cause(Box::new(cause))
    }

    #[must_use]
    pub fn with_boxed_cause(mut self, cause: BoxError) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Overrides the kind's default retryability.
    ///
    /// Configuration errors stay non-retryable.
    #[must_use]
    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable && !self.kind.is_fatal();
        self
    }

    // Kind constructors.

    #[must_use]
    pub fn authentication(code: ErrorCode) -> Self {
        Self::of_kind(ErrorKind::Authentication, code)
    }

    #[must_use]
    pub fn session_expired() -> Self {
        Self::of_kind(ErrorKind::SessionExpired, ErrorCode::AuthSessionExpired)
    }

    #[must_use]
    pub fn credential(code: ErrorCode) -> Self {
        Self::of_kind(ErrorKind::Credential, code)
    }

    #[must_use]
    pub fn publish(code: ErrorCode) -> Self {
        Self::of_kind(ErrorKind::Publish, code)
    }

    /// A transient network failure, retryable.
    #[must_use]
    pub fn network(message: impl Into<Cow<'static, str>>) -> Self {
        Self::of_kind(ErrorKind::Network, ErrorCode::PublishNetwork).with_message(message)
    }

    /// A page element that did not show up (yet), retryable.
    #[must_use]
    pub fn element_not_found(selector: &str) -> Self {
        Self::of_kind(ErrorKind::ElementNotFound, ErrorCode::PublishElementNotFound)
            .with_message(format!("Page element not found: {selector}"))
            .with_context("selector", selector)
    }

    #[must_use]
    pub fn browser(code: ErrorCode) -> Self {
        Self::of_kind(ErrorKind::Browser, code)
    }

    #[must_use]
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::of_kind(ErrorKind::Validation, ErrorCode::PublishValidationFailed)
            .with_message(message)
    }

    #[must_use]
    pub fn analytics(code: ErrorCode) -> Self {
        Self::of_kind(ErrorKind::Analytics, code)
    }

    #[must_use]
    pub fn config(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self::of_kind(ErrorKind::Config, code).with_message(message)
    }

    #[must_use]
    pub fn system(code: ErrorCode) -> Self {
        Self::of_kind(ErrorKind::System, code)
    }

    #[must_use]
    pub fn file_system(operation: &str, path: &Path, source: std::io::Error) -> Self {
        Self::of_kind(ErrorKind::FileSystem, ErrorCode::SystemFile)
            .with_message(format!("File system operation failed: {operation}"))
            .with_context("operation", operation)
            .with_context("filePath", path.display().to_string())
            .with_cause(source)
    }

    #[must_use]
    pub fn crypto(operation: &str) -> Self {
        Self::of_kind(ErrorKind::Crypto, ErrorCode::SystemCrypto)
            .with_message(format!("Encryption/decryption failed: {operation}"))
            .with_context("operation", operation)
    }

    /// The caller stopped waiting for `label` after `timeout`, retryable.
    #[must_use]
    pub fn timeout(label: &str, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        Self::of_kind(ErrorKind::Timeout, ErrorCode::SystemTimeout)
            .with_message(format!("{label} timed out after {millis}ms"))
            .with_context("label", label)
            .with_context("timeoutMs", millis)
    }

    /// Returns `error` unchanged when it already is a `QuillError`, otherwise
    /// `fallback()` carrying `error` as its cause.
    pub fn wrap(error: BoxError, fallback: impl FnOnce() -> Self) -> Self {
        match error.downcast::<Self>() {
            Ok(typed) => *typed,
            Err(foreign) => fallback().with_boxed_cause(foreign),
        }
    }

    // Accessors.

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    #[must_use]
    pub const fn domain(&self) -> ErrorDomain {
        self.code.domain()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn context(&self) -> &Fields {
        &self.context
    }

    #[must_use]
    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Messages of the causal chain, nearest cause first.
    #[must_use]
    pub fn cause_chain(&self) -> Vec<String> {
        let mut chain = Vec::new();
        let mut next: Option<&(dyn StdError + 'static)> =
            self.cause.as_deref().map(|cause| cause as &(dyn StdError + 'static));
        while let Some(err) = next {
            chain.push(err.to_string());
            next = err.source();
        }
        chain
    }

    /// A serializable record for structured logs.
    #[must_use]
    pub fn to_log_record(&self) -> Fields {
        let mut record = Fields::new();
        record.insert("name".into(), json!(self.kind.name()));
        record.insert("code".into(), json!(self.code.as_u16()));
        record.insert("codeName".into(), json!(self.code.name()));
        record.insert("domain".into(), json!(self.domain().as_str()));
        record.insert("message".into(), json!(self.message));
        record.insert("context".into(), Value::Object(self.context.clone()));
        record.insert("retryable".into(), json!(self.retryable));
        record.insert("timestamp".into(), json!(self.timestamp.timestamp_millis()));
        let chain = self.cause_chain();
        if !chain.is_empty() {
            record.insert("cause".into(), json!(chain));
        }
        record
    }

    /// `[Error <code>] <message>`, suitable for operators.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        format!("[Error {}] {}", self.code, self.message)
    }
}
