#![allow(dead_code, unreachable_pub)]

use quill_domain::config::RetryPolicy;
use quill_logger::MemoryLog;
use quill_resilience::Resilience;
use std::num::NonZeroU32;
use std::sync::Arc;

/// An engine wired to a capturing log.
pub fn engine() -> (Resilience, Arc<MemoryLog>) {
    let log = Arc::new(MemoryLog::new());
    (Resilience::new(log.clone()), log)
}

/// The default schedule (1s, 2s, ... capped at 10s) with `attempts` attempts.
pub fn policy(attempts: u32) -> RetryPolicy {
    RetryPolicy::new(NonZeroU32::new(attempts).expect("attempts must be non-zero"))
}
