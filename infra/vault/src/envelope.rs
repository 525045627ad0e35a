//! The on-disk ciphertext format: `ivHex:tagHex:cipherHex`.
//!
//! AES-256-GCM with a 16-byte IV and a 16-byte tag, no associated data. Hex is
//! emitted lowercase; parsing accepts either case.

use crate::error::{EnvelopeError, EnvelopeErrorExt};
use crate::kdf::{self, KdfParams};
use aead::consts::U16;
use aead::inout::InOutBuf;
use aead::{AeadInOut, Key, KeyInit, Nonce, Tag};
use aes_gcm::AesGcm;
use aes_gcm::aes::Aes256;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

pub const IV_LEN: usize = 16;
pub const TAG_LEN: usize = 16;

/// AES-256-GCM instantiated with a 128-bit nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// One sealed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    iv: [u8; IV_LEN],
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl Envelope {
    #[must_use]
    pub const fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    #[must_use]
    pub const fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl FromStr for Envelope {
    type Err = EnvelopeError;

    /// Surrounding whitespace is ignored. Anything other than exactly three
    /// colon-separated segments is rejected.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = text.trim().split(':').collect();
        let [iv, tag, ciphertext] = segments.as_slice() else {
            return Err(EnvelopeError::Malformed {
                message: format!("expected 3 segments, found {}", segments.len()).into(),
                context: None,
            });
        };

        Ok(Self {
            iv: decode_fixed(iv, "iv")?,
            tag: decode_fixed(tag, "tag")?,
            ciphertext: hex::decode(ciphertext).context("ciphertext segment")?,
        })
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.iv),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

fn decode_fixed<const N: usize>(segment: &str, name: &'static str) -> Result<[u8; N], EnvelopeError> {
    let bytes = hex::decode(segment).context(format!("{name} segment"))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| EnvelopeError::Malformed {
        message: format!("{name} must be {N} bytes, got {}", bytes.len()).into(),
        context: None,
    })
}

/// Seals and opens [`Envelope`]s with one derived key.
pub struct EnvelopeCipher {
    cipher: Aes256Gcm16,
}

impl fmt::Debug for EnvelopeCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeCipher").finish_non_exhaustive()
    }
}

impl EnvelopeCipher {
    /// # Errors
    /// [`EnvelopeError::Internal`] if the key cannot be loaded into the cipher.
    pub fn new(key: &[u8; kdf::KEY_LEN]) -> Result<Self, EnvelopeError> {
        let key = Key::<Aes256Gcm16>::try_from(&key[..]).map_err(|_| EnvelopeError::Internal {
            message: format!("Invalid key length {}, must be {}", key.len(), kdf::KEY_LEN).into(),
            context: None,
        })?;
        Ok(Self { cipher: Aes256Gcm16::new(&key) })
    }

    /// Derives the key from `passphrase` and initializes the cipher. The raw key is
    /// wiped before returning.
    ///
    /// # Errors
    /// [`EnvelopeError::Kdf`] for rejected Argon2 parameters.
    pub fn from_passphrase(passphrase: &[u8], params: &KdfParams) -> Result<Self, EnvelopeError> {
        let key = kdf::derive_key(passphrase, params)?;
        Self::new(&key)
    }

    /// Encrypts `plaintext` under a fresh random IV.
    ///
    /// # Errors
    /// [`EnvelopeError::Encryption`] if the system RNG is unavailable.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Envelope, EnvelopeError> {
        let mut iv = [0u8; IV_LEN];
        getrandom::fill(&mut iv).map_err(|e| EnvelopeError::Encryption {
            message: format!("System RNG unavailable: {e}").into(),
            context: None,
        })?;
        let nonce: Nonce<Aes256Gcm16> = iv.as_slice().try_into().map_err(|_| {
            EnvelopeError::Internal { message: "Invalid IV length".into(), context: None }
        })?;

        let mut ciphertext = plaintext.to_vec();
        let tag = self
            .cipher
            .encrypt_inout_detached(&nonce, &[], InOutBuf::from(ciphertext.as_mut_slice()))
            .map_err(|_| EnvelopeError::Encryption {
                message: "AEAD encryption failed".into(),
                context: None,
            })?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(&tag);

        Ok(Envelope { iv, tag: tag_bytes, ciphertext })
    }

    /// Authenticates and decrypts `envelope`.
    ///
    /// # Errors
    /// [`EnvelopeError::Decryption`] for a wrong key or tampered data.
    pub fn open(&self, envelope: &Envelope) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
        let nonce: Nonce<Aes256Gcm16> = envelope.iv.as_slice().try_into().map_err(|_| {
            EnvelopeError::Internal { message: "Invalid IV length".into(), context: None }
        })?;
        let tag: Tag<Aes256Gcm16> = envelope.tag.as_slice().try_into().map_err(|_| {
            EnvelopeError::Internal { message: "Invalid tag length".into(), context: None }
        })?;

        let mut plaintext = Zeroizing::new(envelope.ciphertext.clone());
        self.cipher
            .decrypt_inout_detached(&nonce, &[], InOutBuf::from(plaintext.as_mut_slice()), &tag)
            .map_err(|_| EnvelopeError::Decryption {
                message: "Authentication failed: wrong key or tampered data".into(),
                context: None,
            })?;

        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> EnvelopeCipher {
        EnvelopeCipher::new(&[7u8; kdf::KEY_LEN]).unwrap()
    }

    #[test]
    fn text_form_has_three_lowercase_hex_segments() {
        let text = cipher().seal(b"{\"credentials\":[]}").unwrap().to_string();
        let segments: Vec<&str> = text.split(':').collect();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), IV_LEN * 2);
        assert_eq!(segments[1].len(), TAG_LEN * 2);
        assert!(text.chars().all(|c| c == ':' || c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn parse_accepts_whitespace_and_uppercase() {
        let sealed = cipher().seal(b"payload").unwrap();
        let text = format!("  {}\n", sealed.to_string().to_uppercase());
        assert_eq!(text.parse::<Envelope>().unwrap(), sealed);
    }

    #[test]
    fn parse_rejects_wrong_segment_count() {
        for text in ["abc:def", "a:b:c:d", "", "deadbeef"] {
            let err = text.parse::<Envelope>().unwrap_err();
            assert!(matches!(err, EnvelopeError::Malformed { .. }), "{text:?} gave {err}");
        }
    }

    #[test]
    fn parse_rejects_short_iv() {
        let text = format!("{}:{}:00", "ab".repeat(12), "cd".repeat(TAG_LEN));
        let err = text.parse::<Envelope>().unwrap_err();
        assert!(err.to_string().contains("iv must be 16 bytes, got 12"));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let text = format!("{}:{}:zz", "ab".repeat(IV_LEN), "cd".repeat(TAG_LEN));
        let err = text.parse::<Envelope>().unwrap_err();
        assert!(matches!(err, EnvelopeError::Hex { .. }));
    }

    #[test]
    fn fresh_iv_per_seal() {
        let cipher = cipher();
        let first = cipher.seal(b"same").unwrap();
        let second = cipher.seal(b"same").unwrap();
        assert_ne!(first.iv(), second.iv());
        assert_ne!(first.ciphertext(), second.ciphertext());
    }

    #[test]
    fn tampering_is_detected() {
        let cipher = cipher();
        let mut sealed = cipher.seal(b"secret value").unwrap();
        sealed.ciphertext[0] ^= 0x01;
        assert!(matches!(cipher.open(&sealed).unwrap_err(), EnvelopeError::Decryption { .. }));
    }

    #[test]
    fn wrong_key_is_detected() {
        let sealed = cipher().seal(b"secret value").unwrap();
        let other = EnvelopeCipher::new(&[8u8; kdf::KEY_LEN]).unwrap();
        assert!(matches!(other.open(&sealed).unwrap_err(), EnvelopeError::Decryption { .. }));
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let cipher = cipher();
        let sealed = cipher.seal(b"").unwrap();
        assert!(sealed.ciphertext().is_empty());
        assert!(cipher.open(&sealed).unwrap().is_empty());
    }
}
