//! # Resilience
//!
//! Higher-order combinators that wrap fallible async operations:
//!
//! * [`Resilience::retry`] re-runs an operation with capped exponential backoff,
//!   stopping early on errors the taxonomy marks as non-retryable;
//! * [`Resilience::with_timeout`] bounds how long the caller waits;
//! * [`Resilience::safe`] turns any failure into a fallback value;
//! * [`Resilience::report`] logs a failure with its taxonomy record.
//!
//! Retry decisions only look at [`QuillError::retryable`](quill_errors::QuillError::retryable),
//! found through [`AsQuillError`](quill_errors::AsQuillError).
//!
//! ## Example
//!
//! ```rust
//! use quill_domain::config::RetryPolicy;
//! use quill_errors::QuillError;
//! use quill_logger::NullLog;
//! use quill_resilience::Resilience;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = Resilience::new(Arc::new(NullLog));
//! let policy = RetryPolicy::default().with_delays(1, 5);
//!
//! let value = engine
//!     .retry(&policy, "ping", || async { Ok::<_, QuillError>(42) })
//!     .await
//!     .unwrap();
//! assert_eq!(value, 42);
//!
//! let slow = engine
//!     .with_timeout(
//!         async {
//!             tokio::time::sleep(Duration::from_secs(5)).await;
//!             Ok::<_, QuillError>(())
//!         },
//!         Duration::from_millis(10),
//!         "slow",
//!     )
//!     .await;
//! assert!(slow.unwrap_err().retryable());
//! # }
//! ```

mod backoff;
mod engine;

pub use backoff::Backoff;
pub use engine::Resilience;
pub use tokio_util::sync::CancellationToken;
