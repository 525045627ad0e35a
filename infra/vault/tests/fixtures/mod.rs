use quill_logger::MemoryLog;
use quill_vault::{CredentialStore, KdfParams};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const PASSPHRASE: &str = "test-passphrase-that-is-long-enough-0001";

/// Argon2id at its minimum cost so tests stay fast.
pub const CHEAP_KDF: KdfParams = KdfParams::new(1024, 1, 1);

pub struct Harness {
    pub dir: TempDir,
    pub store: CredentialStore,
    pub log: Arc<MemoryLog>,
}

impl Harness {
    pub fn path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }

    /// Every file in the directory whose name contains `marker`.
    pub fn files_containing(&self, marker: &str) -> Vec<PathBuf> {
        list(self.dir.path())
            .into_iter()
            .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.contains(marker)))
            .collect()
    }
}

/// A store over `credentials.enc` in a fresh temp directory.
///
/// # Panics
/// If the temp directory or the store cannot be created.
#[must_use]
pub fn harness() -> Harness {
    harness_with(PASSPHRASE)
}

#[must_use]
pub fn harness_with(passphrase: &str) -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = Arc::new(MemoryLog::new());
    let store = store_at(&dir.path().join("credentials.enc"), passphrase, log.clone());
    Harness { dir, store, log }
}

#[must_use]
pub fn store_at(path: &Path, passphrase: &str, log: Arc<MemoryLog>) -> CredentialStore {
    CredentialStore::builder()
        .path(path)
        .passphrase(passphrase)
        .kdf(CHEAP_KDF)
        .log(log)
        .build()
        .expect("store setup failed")
}

fn list(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("read_dir")
        .map(|entry| entry.expect("dir entry").path())
        .collect()
}
