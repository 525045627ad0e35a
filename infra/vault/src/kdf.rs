use crate::error::EnvelopeError;
use argon2::{Algorithm, Argon2, Params, Version};
use quill_domain::config::KdfConfig;
use zeroize::Zeroizing;

/// Length of the derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Salt mixed into every derivation.
///
/// It is fixed so that the same passphrase always opens the same file. Changing it
/// invalidates every existing store.
pub const KDF_SALT: &[u8] = b"quill-credential-store-salt/v1";

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl KdfParams {
    #[must_use]
    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self { memory_kib, iterations, parallelism }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        KdfConfig::default().into()
    }
}

impl From<KdfConfig> for KdfParams {
    fn from(config: KdfConfig) -> Self {
        Self::new(config.memory_kib, config.iterations, config.parallelism)
    }
}

/// Stretches `passphrase` into an AES-256 key with Argon2id.
///
/// # Errors
/// [`EnvelopeError::Kdf`] when Argon2 rejects `params`.
pub fn derive_key(
    passphrase: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, EnvelopeError> {
    let argon_params =
        Params::new(params.memory_kib, params.iterations, params.parallelism, Some(KEY_LEN))
            .map_err(|e| EnvelopeError::Kdf {
                message: e.to_string().into(),
                context: Some("Invalid Argon2id parameters".into()),
            })?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params)
        .hash_password_into(passphrase, KDF_SALT, &mut *key)
        .map_err(|e| EnvelopeError::Kdf { message: e.to_string().into(), context: None })?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHEAP: KdfParams = KdfParams::new(1024, 1, 1);

    #[test]
    fn derivation_is_deterministic() {
        let first = derive_key(b"correct horse battery staple", &CHEAP).unwrap();
        let second = derive_key(b"correct horse battery staple", &CHEAP).unwrap();
        assert_eq!(*first, *second);
    }

    #[test]
    fn different_passphrases_give_different_keys() {
        let first = derive_key(b"passphrase-one", &CHEAP).unwrap();
        let second = derive_key(b"passphrase-two", &CHEAP).unwrap();
        assert_ne!(*first, *second);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let err = derive_key(b"whatever", &KdfParams::new(1024, 0, 1)).unwrap_err();
        assert!(matches!(err, EnvelopeError::Kdf { .. }));
    }

    #[test]
    fn defaults_follow_config() {
        let params = KdfParams::default();
        assert_eq!(params, KdfParams::new(19_456, 2, 1));
    }
}
