use config::{Config, Environment, File, FileFormat};
use quill_domain::config::QuillConfig;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "quill.toml";

/// Prefix of environment overrides, e.g. `QUILL__STORE__PATH`.
pub const ENV_PREFIX: &str = "QUILL";

#[quill_derive::quill_error]
pub enum ConfigError {
    #[quill(code = ConfigLoadFailed)]
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads [`QuillConfig`] from layered sources.
///
/// 1. **Defaults**: every field has a serde default, so no source is mandatory.
/// 2. **File**: TOML at `path`. An explicit path must exist; without one,
///    [`DEFAULT_CONFIG_FILE`] is read when present.
/// 3. **Environment**: `QUILL__`-prefixed variables, nested with `__`
///    (`QUILL__RETRY__MAX_ATTEMPTS=5` sets `retry.max_attempts`).
///
/// # Errors
/// [`ConfigError::Config`] when an explicit file is missing, a source cannot be parsed
/// or the merged values do not fit [`QuillConfig`].
pub fn load_config(path: Option<impl AsRef<Path>>) -> Result<QuillConfig, ConfigError> {
    load_layered(path.as_ref().map(AsRef::as_ref), None)
}

fn load_layered(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<QuillConfig, ConfigError> {
    let (file, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(file.as_path()).format(FileFormat::Toml).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

    info!(path = %file.display(), required, "Loading config");

    let config = builder
        .build()
        .context(format!("Failed to read {}", file.display()))?
        .try_deserialize::<QuillConfig>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_errors::{ErrorCode, QuillError};
    use std::io::Write;

    fn toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect())
    }

    #[test]
    fn file_values_override_defaults() {
        let file = toml(
            r#"
            [store]
            path = "/var/lib/quill/credentials.enc"

            [retry]
            max_attempts = 5
            initial_delay_ms = 200
            "#,
        );

        let cfg = load_layered(Some(file.path()), env(&[])).unwrap();

        assert_eq!(cfg.store.path, PathBuf::from("/var/lib/quill/credentials.enc"));
        assert_eq!(cfg.retry.max_attempts.get(), 5);
        assert_eq!(cfg.retry.initial_delay_ms, 200);
        assert_eq!(cfg.retry.max_delay_ms, 10_000);
        assert_eq!(cfg.timeouts.load_ms, 30_000);
    }

    #[test]
    fn environment_overrides_file() {
        let file = toml("[retry]\nmax_attempts = 5\n");

        let cfg = load_layered(
            Some(file.path()),
            env(&[("QUILL__RETRY__MAX_ATTEMPTS", "7"), ("QUILL__LOGGING__LEVEL", "debug")]),
        )
        .unwrap();

        assert_eq!(cfg.retry.max_attempts.get(), 7);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn missing_explicit_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_layered(Some(&dir.path().join("absent.toml")), env(&[])).unwrap_err();
        let typed = QuillError::from(err);

        assert_eq!(typed.code(), ErrorCode::ConfigLoadFailed);
        assert!(!typed.retryable());
    }

    #[test]
    fn zero_attempts_are_rejected() {
        let file = toml("[retry]\nmax_attempts = 0\n");
        assert!(load_layered(Some(file.path()), env(&[])).is_err());
    }
}
