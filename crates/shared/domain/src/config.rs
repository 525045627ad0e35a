use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable the store reads its passphrase from by default.
pub const DEFAULT_PASSPHRASE_ENV: &str = "COOKIE_ENCRYPTION_KEY";

/// Top-level configuration shared by the binaries.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    pub store: StoreConfig,
    pub retry: RetryPolicy,
    pub timeouts: TimeoutConfig,
    pub logging: LoggingConfig,
}

/// Credential store location and key material source.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Explicit passphrase. Takes precedence over `passphrase_env`.
    pub passphrase: Option<String>,
    pub passphrase_env: String,
    pub kdf: KdfConfig,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Retry schedule for one logical operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: NonZeroU32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub exponential: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub load_ms: u64,
    pub save_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub console: bool,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Helpers ---

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: NonZeroU32) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: 1000,
            max_delay_ms: 10_000,
            multiplier: 2.0,
            exponential: true,
        }
    }

    #[must_use]
    pub const fn with_delays(mut self, initial_ms: u64, max_ms: u64) -> Self {
        self.initial_delay_ms = initial_ms;
        self.max_delay_ms = max_ms;
        self
    }

    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[must_use]
    pub const fn fixed(mut self) -> Self {
        self.exponential = false;
        self
    }

    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// The growth factor actually applied: values below 1.0 or non-finite count as 1.0.
    #[must_use]
    pub fn effective_multiplier(&self) -> f64 {
        if self.multiplier.is_finite() && self.multiplier >= 1.0 { self.multiplier } else { 1.0 }
    }
}

impl TimeoutConfig {
    #[must_use]
    pub const fn load(&self) -> Duration {
        Duration::from_millis(self.load_ms)
    }

    #[must_use]
    pub const fn save(&self) -> Duration {
        Duration::from_millis(self.save_ms)
    }
}

// --- Default ---

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data").join("credentials.enc"),
            passphrase: None,
            passphrase_env: DEFAULT_PASSPHRASE_ENV.to_owned(),
            kdf: KdfConfig::default(),
        }
    }
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self { memory_kib: 19_456, iterations: 2, parallelism: 1 }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(NonZeroU32::MIN.saturating_add(2))
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { load_ms: 30_000, save_ms: 30_000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), console: true, directory: None, json: false }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("path", &self.path)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("passphrase_env", &self.passphrase_env)
            .field("kdf", &self.kdf)
            .finish()
    }
}
