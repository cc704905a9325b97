//! Exponential backoff with jitter.
//!
//! `delay = floor(min(initial * factor^(attempt-1), max) * j)` with `j` drawn
//! uniformly from `[0.5, 1.0)`. The random source is pluggable so runs can be
//! reproduced.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::resilience::policy::RetryPolicy;

/// Lower bound of the jitter multiplier.
pub const JITTER_FLOOR: f64 = 0.5;

// Largest accepted sample; keeps the multiplier strictly below 1 after rounding.
const MAX_UNIT: f64 = 1.0 - 1e-9;

/// Source of uniform samples in `[0, 1)`.
pub trait JitterSource: Send + Sync {
    fn next_unit(&mut self) -> f64;
}

/// Default source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Seeded source for reproducible delay sequences.
#[derive(Debug, Clone)]
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl JitterSource for SeededJitter {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same sample.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Delay before the attempt following `attempt` (1-based), before jitter.
pub fn capped_delay_ms(attempt: u32, policy: &RetryPolicy) -> f64 {
    let initial_ms = policy.initial_delay.as_nanos() as f64 / 1e6;
    let max_ms = policy.max_delay.as_nanos() as f64 / 1e6;
    // NaN or sub-unit factors would shrink the delay
    let factor = if policy.backoff_factor.is_finite() && policy.backoff_factor >= 1.0 {
        policy.backoff_factor
    } else {
        1.0
    };

    let exponent = attempt.max(1) - 1;
    let raw = initial_ms * factor.powi(exponent.min(i32::MAX as u32) as i32);
    if raw.is_finite() {
        raw.min(max_ms)
    } else {
        max_ms
    }
}

/// Calculate the jittered backoff delay after a failed `attempt` (1-based).
pub fn calculate_backoff(attempt: u32, policy: &RetryPolicy, jitter: &mut dyn JitterSource) -> Duration {
    let capped = capped_delay_ms(attempt, policy);

    let unit = jitter.next_unit();
    let unit = if unit.is_finite() {
        unit.clamp(0.0, MAX_UNIT)
    } else {
        0.0
    };
    let factor = JITTER_FLOOR + unit * (1.0 - JITTER_FLOOR);

    Duration::from_millis((capped * factor).floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(initial: u64, max: u64, factor: f64) -> RetryPolicy {
        RetryPolicy::default()
            .with_initial_delay(Duration::from_millis(initial))
            .with_max_delay(Duration::from_millis(max))
            .with_backoff_factor(factor)
    }

    #[test]
    fn test_backoff_calculation() {
        let p = policy(100, 2000, 2.0);

        let b1 = calculate_backoff(1, &p, &mut FixedJitter(0.0));
        assert_eq!(b1.as_millis(), 50);

        let b2 = calculate_backoff(2, &p, &mut FixedJitter(0.0));
        assert_eq!(b2.as_millis(), 100);

        let b3 = calculate_backoff(3, &p, &mut FixedJitter(0.5));
        assert_eq!(b3.as_millis(), 300);
    }

    #[test]
    fn test_backoff_never_exceeds_max() {
        let p = policy(100, 1000, 2.0);
        let mut jitter = FixedJitter(0.999_999);
        for attempt in 1..40 {
            let delay = calculate_backoff(attempt, &p, &mut jitter);
            assert!(delay <= Duration::from_millis(1000), "attempt {}: {:?}", attempt, delay);
        }
        assert_eq!(calculate_backoff(10, &p, &mut FixedJitter(0.0)).as_millis(), 500);
    }

    #[test]
    fn test_backoff_bounds_with_random_source() {
        let p = policy(100, 1000, 2.0);
        let mut jitter = SeededJitter::new(7);
        for attempt in 1..8 {
            let capped = capped_delay_ms(attempt, &p);
            for _ in 0..200 {
                let delay = calculate_backoff(attempt, &p, &mut jitter).as_millis() as f64;
                assert!(delay >= (capped * 0.5).floor());
                assert!(delay < capped);
            }
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let p = policy(100, 30_000, 2.0);
        let mut a = SeededJitter::new(42);
        let mut b = SeededJitter::new(42);
        let run_a: Vec<_> = (1..6).map(|n| calculate_backoff(n, &p, &mut a)).collect();
        let run_b: Vec<_> = (1..6).map(|n| calculate_backoff(n, &p, &mut b)).collect();
        assert_eq!(run_a, run_b);
    }

    #[test]
    fn test_huge_attempt_saturates() {
        let p = policy(1000, 30_000, 2.0);
        let delay = calculate_backoff(u32::MAX, &p, &mut FixedJitter(0.0));
        assert_eq!(delay.as_millis(), 15_000);
    }

    #[test]
    fn test_attempt_zero_treated_as_first() {
        let p = policy(100, 1000, 2.0);
        assert_eq!(
            calculate_backoff(0, &p, &mut FixedJitter(0.0)),
            calculate_backoff(1, &p, &mut FixedJitter(0.0))
        );
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let p = policy(100, 1000, 2.0);
        assert_eq!(calculate_backoff(1, &p, &mut FixedJitter(-3.0)).as_millis(), 50);
        assert!(calculate_backoff(1, &p, &mut FixedJitter(5.0)).as_millis() < 100);
        assert_eq!(calculate_backoff(1, &p, &mut FixedJitter(f64::NAN)).as_millis(), 50);
    }

    #[test]
    fn test_sub_millisecond_initial_delay_still_grows() {
        let p = RetryPolicy::default()
            .with_initial_delay(Duration::from_micros(500))
            .with_max_delay(Duration::from_secs(1))
            .with_backoff_factor(10.0);
        assert_eq!(capped_delay_ms(1, &p), 0.5);
        assert_eq!(calculate_backoff(3, &p, &mut FixedJitter(0.0)).as_millis(), 25);
        assert_eq!(calculate_backoff(4, &p, &mut FixedJitter(0.0)).as_millis(), 250);
    }
}
