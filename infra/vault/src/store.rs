use crate::builder::CredentialStoreBuilder;
use crate::envelope::{Envelope, EnvelopeCipher};
use crate::error::EnvelopeError;
use crate::kdf::KdfParams;
use crate::legacy::{self, LegacyPayload};
use chrono::Utc;
use quill_domain::config::StoreConfig;
use quill_domain::{Credential, CredentialSet};
use quill_errors::{ErrorCode, QuillError};
use quill_logger::{EventLog, fields};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use zeroize::Zeroizing;

const TMP_MARKER: &str = ".quilltmp.";
const STALE_TMP_AGE: Duration = Duration::from_secs(300);

pub(crate) struct StoreInner {
    pub(crate) path: PathBuf,
    pub(crate) cipher: EnvelopeCipher,
    pub(crate) log: Arc<dyn EventLog>,
    pub(crate) tmp_counter: AtomicU64,
}

/// An encrypted, file-backed credential store.
///
/// The file holds a single [`Envelope`] over the JSON form of a [`CredentialSet`].
/// Writes are atomic: readers see either the previous file or the new one, never a
/// partial write. Concurrent saves are last-writer-wins.
///
/// Cloning is cheap and shares the derived key.
#[derive(Clone)]
pub struct CredentialStore {
    pub(crate) inner: Arc<StoreInner>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").field("path", &self.inner.path).finish_non_exhaustive()
    }
}

impl CredentialStore {
    #[must_use]
    pub fn builder() -> CredentialStoreBuilder {
        CredentialStoreBuilder::new()
    }

    /// Builds a store from the `[store]` configuration section.
    ///
    /// # Errors
    /// See [`CredentialStoreBuilder::build`].
    pub fn from_config(config: &StoreConfig, log: Arc<dyn EventLog>) -> Result<Self, QuillError> {
        let mut builder = Self::builder()
            .path(config.path.clone())
            .passphrase_env(config.passphrase_env.clone())
            .kdf(KdfParams::from(config.kdf))
            .log(log);
        if let Some(passphrase) = &config.passphrase {
            builder = builder.passphrase(passphrase.as_str());
        }
        builder.build()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Reads the stored credentials.
    ///
    /// A missing file is an empty set. A legacy plaintext file is backed up to
    /// `<path>.backup.<epoch-ms>` and rewritten encrypted before its credentials are
    /// returned.
    ///
    /// # Errors
    /// * [`ErrorCode::SystemFile`] when the file cannot be read;
    /// * [`ErrorCode::SystemCrypto`] for a malformed envelope, a wrong passphrase,
    ///   tampered data or a decrypted payload that is not a credential set;
    /// * [`ErrorCode::AuthCookieInvalid`] for a legacy file that is not valid JSON;
    /// * [`ErrorCode::AuthCookieLoadFailed`] when migrating a legacy file fails.
    pub async fn load(&self) -> Result<CredentialSet, QuillError> {
        let path = &self.inner.path;

        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.inner.log.debug(
                    "No credential file found",
                    &fields! { "filePath" => path.display().to_string() },
                );
                return Ok(CredentialSet::default());
            },
            Err(e) => return Err(QuillError::file_system("read", path, e)),
        };

        let text = String::from_utf8(bytes).map_err(|_| {
            self.crypto_error(
                "decode",
                EnvelopeError::Malformed { message: "file is not valid UTF-8".into(), context: None },
            )
        })?;

        if legacy::is_legacy(&text) {
            return self.migrate(&text).await;
        }

        let set = self.open(&text).map_err(|e| self.crypto_error("decrypt", e))?;

        self.inner.log.info(
            "Credentials loaded",
            &fields! { "count" => set.len(), "filePath" => path.display().to_string() },
        );
        Ok(set)
    }

    /// Encrypts `credentials` stamped with the current time and atomically replaces
    /// the file. Returns the set as written.
    ///
    /// # Errors
    /// * [`ErrorCode::SystemFile`] when the directory or file cannot be written;
    /// * [`ErrorCode::SystemCrypto`] when encryption fails;
    /// * [`ErrorCode::AuthCookieSaveFailed`] when the set cannot be serialized.
    pub async fn save(&self, credentials: &[Credential]) -> Result<CredentialSet, QuillError> {
        let set = CredentialSet::new(credentials.to_vec(), Utc::now());

        let plaintext = Zeroizing::new(serde_json::to_vec(&set).map_err(|e| {
            QuillError::credential(ErrorCode::AuthCookieSaveFailed)
                .with_context("filePath", self.inner.path.display().to_string())
                .with_cause(e)
        })?);
        let envelope =
            self.inner.cipher.seal(&plaintext).map_err(|e| self.crypto_error("encrypt", e))?;

        self.write_atomic(envelope.to_string().as_bytes()).await?;
        self.purge_stale_tmp().await;

        self.inner.log.info(
            "Credentials saved",
            &fields! { "count" => set.len(), "filePath" => self.inner.path.display().to_string() },
        );
        Ok(set)
    }

    /// Deletes the file. Deleting a file that does not exist succeeds.
    ///
    /// # Errors
    /// [`ErrorCode::SystemFile`] for any other failure.
    pub async fn clear(&self) -> Result<(), QuillError> {
        let path = &self.inner.path;
        match fs::remove_file(path).await {
            Ok(()) => {
                self.inner
                    .log
                    .info("Credentials cleared", &fields! { "filePath" => path.display().to_string() });
                Ok(())
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuillError::file_system("unlink", path, e)),
        }
    }

    /// Whether the file is present. Says nothing about whether it can be decrypted.
    ///
    /// # Errors
    /// [`ErrorCode::SystemFile`] when existence cannot be determined.
    pub async fn exists(&self) -> Result<bool, QuillError> {
        fs::try_exists(&self.inner.path)
            .await
            .map_err(|e| QuillError::file_system("stat", &self.inner.path, e))
    }

    fn open(&self, text: &str) -> Result<CredentialSet, EnvelopeError> {
        let envelope: Envelope = text.parse()?;
        let plaintext = self.inner.cipher.open(&envelope)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }

    fn crypto_error(&self, operation: &str, source: EnvelopeError) -> QuillError {
        QuillError::from(source)
            .with_context("operation", operation)
            .with_context("filePath", self.inner.path.display().to_string())
    }

    async fn migrate(&self, text: &str) -> Result<CredentialSet, QuillError> {
        let path = &self.inner.path;
        let payload = LegacyPayload::parse(text, path)?;

        self.inner.log.warn(
            "Legacy plaintext credential file detected, migrating to encrypted format",
            &fields! { "filePath" => path.display().to_string() },
        );

        let backup = backup_path(path);
        fs::copy(path, &backup).await.map_err(|e| {
            QuillError::credential(ErrorCode::AuthCookieLoadFailed)
                .with_message("Failed to back up legacy credential file")
                .with_context("filePath", path.display().to_string())
                .with_context("backupPath", backup.display().to_string())
                .with_cause(e)
        })?;

        let saved = self.save(&payload.into_credentials()).await.map_err(|e| {
            QuillError::credential(ErrorCode::AuthCookieLoadFailed)
                .with_message("Failed to migrate legacy credential file")
                .with_context("filePath", path.display().to_string())
                .with_context("backupPath", backup.display().to_string())
                .with_cause(e)
        })?;

        self.inner.log.info(
            "Legacy credentials migrated",
            &fields! {
                "count" => saved.len(),
                "filePath" => path.display().to_string(),
                "backupPath" => backup.display().to_string(),
            },
        );
        Ok(saved)
    }

    async fn write_atomic(&self, data: &[u8]) -> Result<(), QuillError> {
        let target = &self.inner.path;

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| QuillError::file_system("mkdir", parent, e))?;
        }

        let temp = unique_tmp_path(target, &self.inner.tmp_counter);

        let written = async {
            let mut file = fs::OpenOptions::new().create_new(true).write(true).open(&temp).await?;
            file.write_all(data).await?;
            file.sync_all().await
        }
        .await;
        if let Err(e) = written {
            let _ = fs::remove_file(&temp).await;
            return Err(QuillError::file_system("write", &temp, e));
        }

        if let Err(e) = swap(&temp, target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(QuillError::file_system("rename", target, e));
        }

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.sync_dir(parent).await;
        }
        Ok(())
    }

    async fn sync_dir(&self, dir: &Path) {
        let synced = match fs::File::open(dir).await {
            Ok(handle) => handle.sync_all().await,
            Err(e) => Err(e),
        };
        if let Err(e) = synced {
            self.inner.log.debug(
                "Directory sync failed",
                &fields! { "path" => dir.display().to_string(), "error" => e.to_string() },
            );
        }
    }

    /// Removes temp siblings left behind by interrupted writes.
    async fn purge_stale_tmp(&self) {
        let target = &self.inner.path;
        let Some(prefix) = tmp_prefix(target) else { return };
        let dir = match target.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };

        let Ok(mut entries) = fs::read_dir(&dir).await else { return };
        let now = SystemTime::now();
        let mut removed = 0_usize;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_ours = entry.file_name().to_str().is_some_and(|name| name.starts_with(&prefix));
            if !is_ours {
                continue;
            }
            let stale = entry
                .metadata()
                .await
                .ok()
                .and_then(|m| m.modified().ok())
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > STALE_TMP_AGE);
            if stale && fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }

        if removed > 0 {
            self.inner.log.info("Cleaned up temporary files", &fields! { "removed" => removed });
        }
    }
}

/// Renames `temp` over `target`, removing `target` first on platforms that refuse to
/// replace an existing file.
async fn swap(temp: &Path, target: &Path) -> std::io::Result<()> {
    match fs::rename(temp, target).await {
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            fs::remove_file(target).await?;
            fs::rename(temp, target).await
        },
        other => other,
    }
}

fn tmp_prefix(target: &Path) -> Option<String> {
    let file_name = target.file_name()?.to_str()?;
    Some(format!("{file_name}{TMP_MARKER}"))
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("credentials");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{}.{counter}", std::process::id()))
}

fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(format!(".backup.{}", Utc::now().timestamp_millis()));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_paths_are_unique_siblings() {
        let counter = AtomicU64::new(0);
        let target = Path::new("/data/credentials.enc");

        let first = unique_tmp_path(target, &counter);
        let second = unique_tmp_path(target, &counter);

        assert_ne!(first, second);
        assert_eq!(first.parent(), target.parent());
        let prefix = tmp_prefix(target).unwrap();
        assert!(first.file_name().unwrap().to_str().unwrap().starts_with(&prefix));
    }

    #[test]
    fn backup_path_appends_timestamp() {
        let backup = backup_path(Path::new("/data/credentials.enc"));
        let name = backup.file_name().unwrap().to_str().unwrap();

        let stamp = name.strip_prefix("credentials.enc.backup.").unwrap();
        assert!(stamp.parse::<i64>().unwrap() > 0);
    }
}
