//! # Error Taxonomy
//!
//! Every failure observed above the credential layer is a [`QuillError`]: a value
//! carrying a stable numeric [`ErrorCode`], the [`ErrorDomain`] that code belongs to,
//! the concrete [`ErrorKind`], a human message, a structured context map, a
//! retryability flag, a timestamp and an optional causal chain.
//!
//! Codes partition by domain:
//!
//! ```text
//! 1xxx  authentication
//! 2xxx  publishing / network
//! 3xxx  analytics
//! 4xxx  configuration
//! 9xxx  system (file system, cryptography, timeouts)
//! ```
//!
//! The retry engine only ever looks at [`QuillError::retryable`]; it never parses
//! messages. Foreign errors are brought into the taxonomy at component boundaries with
//! [`QuillResultExt::or_quill`] or [`QuillError::wrap`].
//!
//! ## Example
//!
//! ```rust
//! use quill_errors::{ErrorCode, ErrorDomain, QuillError, QuillResultExt};
//!
//! let err = QuillError::network("upstream reset the connection")
//!     .with_context("attempt", 2);
//! assert!(err.retryable());
//! assert_eq!(err.code().domain(), ErrorDomain::Publish);
//!
//! let io: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
//! let typed = io.or_quill(|| QuillError::new(ErrorCode::SystemFile)).unwrap_err();
//! assert_eq!(typed.code(), ErrorCode::SystemFile);
//! assert!(typed.to_user_message().starts_with("[Error 9001]"));
//! ```

mod code;
mod error;
mod ext;
mod kind;

pub use code::{ErrorCode, ErrorDomain};
pub use error::QuillError;
pub use ext::{AsQuillError, QuillResultExt};
pub use kind::ErrorKind;

/// A structured key → JSON value map attached to errors and log calls.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A specialized [`Result`](std::result::Result) defaulting to [`QuillError`].
pub type Result<T, E = QuillError> = std::result::Result<T, E>;
