use quill_domain::config::RetryPolicy;
use std::time::Duration;

/// The sleeps between attempts of a [`RetryPolicy`].
///
/// Yields `max_attempts - 1` delays. The first one is `initial_delay`; with exponential
/// growth each following one is the previous times the multiplier, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
    multiplier: f64,
    exponential: bool,
    remaining: u32,
}

impl Backoff {
    #[must_use]
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            next: policy.initial_delay(),
            max: policy.max_delay(),
            multiplier: policy.effective_multiplier(),
            exponential: policy.exponential,
            remaining: policy.max_attempts.get() - 1,
        }
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.next;
        if self.exponential {
            let scaled = Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
                .unwrap_or(Duration::MAX);
            self.next = scaled.min(self.max);
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Backoff {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    fn attempts(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).expect("non-zero")
    }

    fn millis(backoff: Backoff) -> Vec<u128> {
        backoff.map(|d| d.as_millis()).collect()
    }

    #[test]
    fn default_policy_sequence() {
        assert_eq!(millis(Backoff::new(&RetryPolicy::default())), vec![1000, 2000]);
    }

    #[test]
    fn sequence_is_capped_at_max_delay() {
        let policy = RetryPolicy::new(attempts(6)).with_delays(1000, 5000);
        assert_eq!(millis(Backoff::new(&policy)), vec![1000, 2000, 4000, 5000, 5000]);
    }

    #[test]
    fn fixed_policy_repeats_initial_delay() {
        let policy = RetryPolicy::new(attempts(4)).with_delays(250, 10_000).fixed();
        assert_eq!(millis(Backoff::new(&policy)), vec![250, 250, 250]);
    }

    #[test]
    fn single_attempt_never_sleeps() {
        let backoff = Backoff::new(&RetryPolicy::new(NonZeroU32::MIN));
        assert_eq!(backoff.len(), 0);
        assert_eq!(millis(backoff), Vec::<u128>::new());
    }

    #[test]
    fn sub_unit_multiplier_does_not_shrink_delays() {
        let policy = RetryPolicy::new(attempts(4)).with_delays(100, 1000).with_multiplier(0.1);
        assert_eq!(millis(Backoff::new(&policy)), vec![100, 100, 100]);
    }

    #[test]
    fn huge_multiplier_saturates_to_max() {
        let policy = RetryPolicy::new(attempts(3)).with_delays(10, 60_000).with_multiplier(1e300);
        assert_eq!(millis(Backoff::new(&policy)), vec![10, 60_000]);
    }
}
