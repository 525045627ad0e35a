//! Kernel utilities shared by the binaries.
//! Keep this crate lightweight; it owns configuration loading and re-exports the domain.
//!
//! ## Config loading
//! ```rust,no_run
//! use quill_kernel::config::load_config;
//!
//! let cfg = load_config(Some("quill.toml")).unwrap();
//! println!("{}", cfg.store.path.display());
//! ```
pub mod config;

pub use quill_domain as domain;
