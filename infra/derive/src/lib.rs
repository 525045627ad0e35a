#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the Quill infrastructure.
//! This crate provides attribute macros for subsystem error enums and for
//! bootstrapping the async runtime of the binaries.
//!
//! ## Usage
//! Depend on it through the crate that re-exports it (`quill-runtime` for `main`),
//! or directly for `quill_error`:
//! ```toml
//! [dependencies]
//! quill-derive = { path = "../infra/derive" }
//! ```
//!
//! See each macro’s docstring for examples; they are `ignore`d to avoid compiling in this crate,
//! but should be copied into consuming crates’ tests/examples as needed.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Attribute macro to bootstrap the Tokio runtime.
///
/// This macro transforms an `async fn main` into a standard `fn main` that initializes
/// a pre-configured Tokio runtime based on the specified scheduling profile.
///
/// # Arguments
///
/// * `current_thread` - Single-threaded cooperative scheduling (the default).
/// * `multi_thread` - Work-stealing scheduler sized from available parallelism.
/// * `default` - Same as `current_thread`.
///
/// # Examples
///
/// ```rust,ignore
/// #[quill_runtime::main(current_thread)]
/// async fn main() -> anyhow::Result<()> {
/// # Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// A high-level attribute macro for defining subsystem error enums.
///
/// This macro reduces boilerplate by transforming a standard enum into a fully-featured
/// error type that plugs into the Quill error taxonomy.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `#[source]` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides specialized `From<&str>` and `From<String>` implementations
///   if an `Internal` variant is present.
/// * **Taxonomy Bridge**: When at least one variant carries `#[quill(code = ...)]`, generates
///   `From<ErrorName> for quill_errors::QuillError`. Unannotated variants map to
///   `SystemUnknown`. An optional `retryable = bool` overrides the kind's default flag.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]` (compatible with `thiserror`).
/// 4. Tuple or unit variants are rejected to keep error wiring explicit and reliable.
/// 5. The taxonomy bridge requires the consuming crate to depend on `quill-errors`.
///
/// # Example
///
/// ```rust,ignore
/// use quill_derive::quill_error;
/// use std::borrow::Cow;
///
/// #[quill_error]
/// pub enum EnvelopeError {
///     #[quill(code = SystemCrypto)]
///     #[error("Malformed envelope{}: {message}", format_context(.context))]
///     Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[quill(code = SystemCrypto)]
///     #[error("Hex decoding failed{}: {source}", format_context(.context))]
///     Hex { source: hex::FromHexError, context: Option<Cow<'static, str>> },
/// }
///
/// fn open(raw: &str) -> Result<Vec<u8>, EnvelopeError> {
///     hex::decode(raw).context("ciphertext segment")
/// }
///
/// // At the component boundary:
/// let err: quill_errors::QuillError = open("zz").unwrap_err().into();
/// ```
#[proc_macro_attribute]
pub fn quill_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
