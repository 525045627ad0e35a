//! Encrypted-at-rest storage for session credentials.
//!
//! ## File Format
//!
//! The store file is one line of lowercase hex:
//!
//! ```text
//! ivHex:tagHex:cipherHex
//! ```
//!
//! AES-256-GCM with a random 16-byte IV per write and a 16-byte tag. The plaintext is
//! the JSON form of a [`CredentialSet`](quill_domain::CredentialSet):
//! `{"credentials": [...], "savedAt": <epoch-ms>}`.
//!
//! ## Key Derivation
//!
//! The key is derived once, when the store is built, from a passphrase of at least
//! [`MIN_PASSPHRASE_LEN`] characters using Argon2id over the fixed [`KDF_SALT`]. The
//! passphrase comes from the builder or, failing that, from an environment variable
//! (`COOKIE_ENCRYPTION_KEY` by default).
//!
//! ## Legacy Files
//!
//! Files written before encryption at rest are plaintext JSON
//! (`{"cookies": [...], "timestamp": <epoch-ms>}`). [`CredentialStore::load`] recognizes
//! them, copies the original bytes to `<path>.backup.<epoch-ms>`, rewrites the file
//! encrypted and returns the credentials. Later loads see the envelope.
//!
//! ## Example
//!
//! ```rust
//! use quill_domain::Credential;
//! use quill_vault::{CredentialStore, KdfParams};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), quill_errors::QuillError> {
//! # let dir = tempfile::tempdir().unwrap();
//! let store = CredentialStore::builder()
//!     .path(dir.path().join("credentials.enc"))
//!     .passphrase("a-passphrase-of-at-least-32-characters")
//!     .kdf(KdfParams::new(1024, 1, 1))
//!     .build()?;
//!
//! store.save(&[Credential::new("sid", "abc", ".example.com")]).await?;
//!
//! let set = store.load().await?;
//! assert_eq!(set.credentials[0].value, "abc");
//! # Ok(())
//! # }
//! ```

mod builder;
mod envelope;
mod error;
mod kdf;
mod legacy;
mod storage;
mod store;

pub use builder::{CredentialStoreBuilder, MIN_PASSPHRASE_LEN, NoPath, WithPath};
pub use envelope::{Envelope, EnvelopeCipher, IV_LEN, TAG_LEN};
pub use error::{EnvelopeError, EnvelopeErrorExt};
pub use kdf::{KDF_SALT, KEY_LEN, KdfParams, derive_key};
pub use storage::{CredentialStorage, MemoryCredentialStore};
pub use store::CredentialStore;
