use crate::store::CredentialStore;
use chrono::Utc;
use quill_domain::{Credential, CredentialSet};
use quill_errors::QuillError;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

/// The contract callers program against, so tests can swap the encrypted file for
/// [`MemoryCredentialStore`].
pub trait CredentialStorage: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<CredentialSet, QuillError>> + Send;

    fn save(
        &self,
        credentials: &[Credential],
    ) -> impl Future<Output = Result<CredentialSet, QuillError>> + Send;

    fn clear(&self) -> impl Future<Output = Result<(), QuillError>> + Send;

    fn exists(&self) -> impl Future<Output = Result<bool, QuillError>> + Send;
}

impl CredentialStorage for CredentialStore {
    fn load(&self) -> impl Future<Output = Result<CredentialSet, QuillError>> + Send {
        Self::load(self)
    }

    fn save(
        &self,
        credentials: &[Credential],
    ) -> impl Future<Output = Result<CredentialSet, QuillError>> + Send {
        Self::save(self, credentials)
    }

    fn clear(&self) -> impl Future<Output = Result<(), QuillError>> + Send {
        Self::clear(self)
    }

    fn exists(&self) -> impl Future<Output = Result<bool, QuillError>> + Send {
        Self::exists(self)
    }
}

/// Unencrypted in-process storage for tests. `exists` reports whether any
/// credentials are held, so saving an empty set leaves it false.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<CredentialSet>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CredentialSet>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStorage for MemoryCredentialStore {
    async fn load(&self) -> Result<CredentialSet, QuillError> {
        Ok(self.lock().clone().unwrap_or_default())
    }

    async fn save(&self, credentials: &[Credential]) -> Result<CredentialSet, QuillError> {
        let set = CredentialSet::new(credentials.to_vec(), Utc::now());
        *self.lock() = Some(set.clone());
        Ok(set)
    }

    async fn clear(&self) -> Result<(), QuillError> {
        *self.lock() = None;
        Ok(())
    }

    async fn exists(&self) -> Result<bool, QuillError> {
        Ok(self.lock().as_ref().is_some_and(|set| !set.is_empty()))
    }
}
