//! Key hold-time generation.
//!
//! A real button stays down for many thousands of clock cycles, so each
//! push is released after a random number of ticks. The source of that
//! number sits behind [`ReleaseDelay`] so tests can pin it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait ReleaseDelay {
    /// Ticks until release, in `[min, min + span)`. A zero `span` yields `min`.
    fn next_delay(&mut self, min: u64, span: u64) -> u64;
}

/// Uniformly random hold times.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    rng: StdRng,
}

impl RandomDelay {
    pub fn new() -> Self {
        RandomDelay {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomDelay {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseDelay for RandomDelay {
    fn next_delay(&mut self, min: u64, span: u64) -> u64 {
        if span == 0 {
            return min;
        }
        min.saturating_add(self.rng.gen_range(0..span))
    }
}

/// Always the same offset above the minimum, clamped into the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedDelay {
    offset: u64,
}

impl FixedDelay {
    pub fn new(offset: u64) -> Self {
        FixedDelay { offset }
    }

    /// Every key is released after exactly the minimum hold time.
    pub fn minimum() -> Self {
        FixedDelay { offset: 0 }
    }
}

impl ReleaseDelay for FixedDelay {
    fn next_delay(&mut self, min: u64, span: u64) -> u64 {
        min.saturating_add(self.offset.min(span.saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_delay_stays_in_window() {
        let mut delay = RandomDelay::seeded(42);
        for _ in 0..1000 {
            let d = delay.next_delay(10, 250);
            assert!((10..260).contains(&d), "delay {} out of range", d);
        }
    }

    #[test]
    fn test_seeded_delays_repeat() {
        let mut a = RandomDelay::seeded(7);
        let mut b = RandomDelay::seeded(7);
        let left: Vec<u64> = (0..16).map(|_| a.next_delay(10, 250)).collect();
        let right: Vec<u64> = (0..16).map(|_| b.next_delay(10, 250)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_zero_span() {
        assert_eq!(RandomDelay::seeded(1).next_delay(10, 0), 10);
        assert_eq!(FixedDelay::new(5).next_delay(10, 0), 10);
    }

    #[test]
    fn test_fixed_delay_clamps() {
        assert_eq!(FixedDelay::minimum().next_delay(10, 250), 10);
        assert_eq!(FixedDelay::new(3).next_delay(10, 250), 13);
        assert_eq!(FixedDelay::new(1000).next_delay(10, 250), 259);
    }
}
