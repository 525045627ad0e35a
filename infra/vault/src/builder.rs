use crate::envelope::EnvelopeCipher;
use crate::kdf::KdfParams;
use crate::store::{CredentialStore, StoreInner};
use private::Sealed;
use quill_domain::config::DEFAULT_PASSPHRASE_ENV;
use quill_errors::{ErrorCode, QuillError};
use quill_logger::{EventLog, TracingLog, fields};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use zeroize::Zeroizing;

/// Passphrases shorter than this many characters are refused.
pub const MIN_PASSPHRASE_LEN: usize = 32;

#[derive(Debug, Default)]
pub struct NoPath;
#[derive(Debug)]
pub struct WithPath(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoPath {}
impl Sealed for WithPath {}

/// Configures a [`CredentialStore`].
///
/// [`build`](CredentialStoreBuilder::build) is only available once a path is set. It
/// validates the passphrase and derives the key, but never touches the file system.
#[allow(private_bounds)]
pub struct CredentialStoreBuilder<P: Sealed = NoPath> {
    path: P,
    passphrase: Option<Zeroizing<String>>,
    passphrase_env: Cow<'static, str>,
    kdf: KdfParams,
    log: Option<Arc<dyn EventLog>>,
}

#[allow(private_bounds)]
impl<P: Sealed + fmt::Debug> fmt::Debug for CredentialStoreBuilder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStoreBuilder")
            .field("path", &self.path)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("passphrase_env", &self.passphrase_env)
            .field("kdf", &self.kdf)
            .finish_non_exhaustive()
    }
}

impl Default for CredentialStoreBuilder {
    fn default() -> Self {
        Self {
            path: NoPath,
            passphrase: None,
            passphrase_env: Cow::Borrowed(DEFAULT_PASSPHRASE_ENV),
            kdf: KdfParams::default(),
            log: None,
        }
    }
}

impl CredentialStoreBuilder {
    #[must_use = "Builder must be given a `path` before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file the store reads and writes.
    pub fn path(self, path: impl Into<PathBuf>) -> CredentialStoreBuilder<WithPath> {
        CredentialStoreBuilder {
            path: WithPath(path.into()),
            passphrase: self.passphrase,
            passphrase_env: self.passphrase_env,
            kdf: self.kdf,
            log: self.log,
        }
    }
}

#[allow(private_bounds)]
impl<P: Sealed> CredentialStoreBuilder<P> {
    /// An explicit passphrase. An empty one counts as absent.
    #[must_use]
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase.into()));
        self
    }

    /// The environment variable consulted when no explicit passphrase is set.
    #[must_use]
    pub fn passphrase_env(mut self, var: impl Into<Cow<'static, str>>) -> Self {
        self.passphrase_env = var.into();
        self
    }

    #[must_use]
    pub const fn kdf(mut self, params: KdfParams) -> Self {
        self.kdf = params;
        self
    }

    /// Where the store reports its events. Defaults to a [`TracingLog`] tagged `vault`.
    #[must_use]
    pub fn log(mut self, log: Arc<dyn EventLog>) -> Self {
        self.log = Some(log);
        self
    }
}

impl CredentialStoreBuilder<WithPath> {
    /// Resolves the passphrase and derives the key.
    ///
    /// # Errors
    /// * [`ErrorCode::ConfigEnvMissing`] when neither an explicit passphrase nor the
    ///   environment variable is set;
    /// * [`ErrorCode::ConfigValidationFailed`] when the passphrase is shorter than
    ///   [`MIN_PASSPHRASE_LEN`] characters or the KDF parameters are rejected.
    pub fn build(self) -> Result<CredentialStore, QuillError> {
        let log = self.log.unwrap_or_else(|| Arc::new(TracingLog::new("vault")));
        let passphrase = resolve_passphrase(self.passphrase, &self.passphrase_env)?;

        let length = passphrase.chars().count();
        if length < MIN_PASSPHRASE_LEN {
            log.warn(
                "Encryption passphrase is too short",
                &fields! { "minLength" => MIN_PASSPHRASE_LEN, "currentLength" => length },
            );
            return Err(QuillError::config(
                ErrorCode::ConfigValidationFailed,
                format!(
                    "Credential encryption passphrase must be at least {MIN_PASSPHRASE_LEN} characters long (current: {length})"
                ),
            )
            .with_context("field", self.passphrase_env.as_ref())
            .with_context("minLength", MIN_PASSPHRASE_LEN)
            .with_context("currentLength", length));
        }

        let cipher = EnvelopeCipher::from_passphrase(passphrase.as_bytes(), &self.kdf)?;
        let WithPath(path) = self.path;

        log.debug(
            "Credential store initialized",
            &fields! { "filePath" => path.display().to_string() },
        );

        Ok(CredentialStore {
            inner: Arc::new(StoreInner { path, cipher, log, tmp_counter: AtomicU64::new(0) }),
        })
    }
}

fn resolve_passphrase(
    explicit: Option<Zeroizing<String>>,
    var: &str,
) -> Result<Zeroizing<String>, QuillError> {
    if let Some(passphrase) = explicit.filter(|p| !p.is_empty()) {
        return Ok(passphrase);
    }

    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(Zeroizing::new(value)),
        _ => Err(QuillError::config(
            ErrorCode::ConfigEnvMissing,
            format!("Credential encryption passphrase is required. Set the {var} environment variable."),
        )
        .with_context("field", var)
        .with_context("hint", format!("Generate one with: openssl rand -hex 32, then export {var}=..."))),
    }
}
