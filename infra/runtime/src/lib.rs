//! # Runtime
//!
//! Tokio runtime profiles for the binaries.
//!
//! Credential tooling is I/O-light and short-lived, so the default profile is a
//! current-thread runtime. A multi-thread preset exists for embedding the store in
//! larger services.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[quill_runtime::main]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use quill_derive::main;

use anyhow::anyhow;
use std::thread::available_parallelism;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// The default number of worker threads if detection fails.
const DEFAULT_WORKER_THREADS: usize = 4;
const MAX_WORKER_THREADS: usize = 1024;
/// Minimum allowed stack size (1 `MiB`).
const MIN_STACK_SIZE: usize = 1024 * 1024;
/// Maximum allowed stack size (16 `MiB`).
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    CurrentThread,
    MultiThread,
}

/// Configuration for the Tokio runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub flavor: Flavor,
    /// Ignored by [`Flavor::CurrentThread`].
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::current_thread()
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn current_thread() -> Self {
        Self {
            flavor: Flavor::CurrentThread,
            worker_threads: 1,
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: "quill-main".to_owned(),
        }
    }

    /// Worker count comes from `TOKIO_WORKER_THREADS` or the available parallelism.
    #[must_use]
    pub fn multi_thread() -> Self {
        Self {
            flavor: Flavor::MultiThread,
            worker_threads: detect_worker_threads(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: "quill-worker".to_owned(),
        }
    }

    #[must_use = "Customize the number of worker threads for the runtime"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.thread_name = name;
        }
        self
    }
}

fn detect_worker_threads() -> usize {
    std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0 && n <= MAX_WORKER_THREADS)
        .unwrap_or_else(|| {
            available_parallelism().map(std::num::NonZero::get).unwrap_or(DEFAULT_WORKER_THREADS)
        })
}

/// Builds a runtime with I/O and timers enabled.
///
/// # Errors
/// Returns an [`anyhow::Error`] if the OS refuses to create the runtime's threads.
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime> {
    debug!(config = ?config, "Building tokio runtime");

    let mut builder = match config.flavor {
        Flavor::CurrentThread => Builder::new_current_thread(),
        Flavor::MultiThread => {
            let mut builder = Builder::new_multi_thread();
            builder.worker_threads(config.worker_threads.clamp(1, MAX_WORKER_THREADS));
            builder
        },
    };

    builder
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE))
        .enable_all();

    builder.build().map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_current_thread() {
        assert_eq!(RuntimeConfig::default().flavor, Flavor::CurrentThread);
    }

    #[test]
    fn builder_methods_clamp() {
        let config = RuntimeConfig::multi_thread().with_worker_threads(0).with_stack_size(100);
        assert_eq!(config.worker_threads, 1);
        assert_eq!(config.stack_size, MIN_STACK_SIZE);

        let config = RuntimeConfig::multi_thread()
            .with_worker_threads(5000)
            .with_stack_size(100 * 1024 * 1024);
        assert_eq!(config.worker_threads, MAX_WORKER_THREADS);
        assert_eq!(config.stack_size, MAX_STACK_SIZE);
    }

    #[test]
    fn blank_thread_name_is_ignored() {
        let config = RuntimeConfig::current_thread().with_thread_name("  ");
        assert_eq!(config.thread_name, "quill-main");
    }

    #[test]
    fn both_flavors_run_timers() {
        for config in [RuntimeConfig::current_thread(), RuntimeConfig::multi_thread().with_worker_threads(2)] {
            let rt = build_runtime(&config).unwrap();
            let value = rt.block_on(async {
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                7
            });
            assert_eq!(value, 7);
        }
    }
}
