//! # Envelope Errors
//!
//! Failures of the cryptographic layer. They cross the store boundary as
//! [`QuillError`](quill_errors::QuillError)s through the generated `From` impl.

use std::borrow::Cow;

#[quill_derive::quill_error]
pub enum EnvelopeError {
    /// The text does not have the `iv:tag:ciphertext` shape, or a segment has the wrong size.
    #[quill(code = SystemCrypto)]
    #[error("Malformed envelope{}: {message}", format_context(.context))]
    Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[quill(code = SystemCrypto)]
    #[error("Hex decoding failed{}: {source}", format_context(.context))]
    Hex { source: hex::FromHexError, context: Option<Cow<'static, str>> },

    #[quill(code = SystemCrypto)]
    #[error("Encryption failed{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Wrong key, tampered ciphertext or a bad tag; AES-GCM cannot tell them apart.
    #[quill(code = SystemCrypto)]
    #[error("Decryption failed{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The decrypted plaintext is not a credential payload.
    #[quill(code = SystemCrypto)]
    #[error("Payload decoding failed{}: {source}", format_context(.context))]
    Payload { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Argon2 rejected its parameters.
    #[quill(code = ConfigValidationFailed)]
    #[error("Key derivation failed{}: {message}", format_context(.context))]
    Kdf { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal envelope error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
