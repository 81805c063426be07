//! Explicit randomness source for dice handlers.
//!
//! Handlers never reach for ambient randomness; they draw from a
//! [`RandomSource`] threaded through the command context, so tests can
//! substitute a scripted sequence.

use std::collections::VecDeque;

use rand::Rng;

/// A source of uniform picks.
pub trait RandomSource: Send {
    /// Uniform pick in `[1, upper]`. An `upper` below 1 is clamped to 1.
    fn pick(&mut self, upper: u64) -> u64;
}

/// Production source backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&mut self, upper: u64) -> u64 {
        rand::thread_rng().gen_range(1..=upper.max(1))
    }
}

/// Deterministic source replaying a fixed sequence of picks.
///
/// Values are returned in order regardless of the requested range;
/// once the script is exhausted every pick returns 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<u64>,
}

impl ScriptedRandom {
    /// Create a source replaying `values` in order.
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, _upper: u64) -> u64 {
        self.values.pop_front().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_random_respects_bounds() {
        let mut rng = ThreadRandom;
        for _ in 0..100 {
            let value = rng.pick(6);
            assert!((1..=6).contains(&value));
        }
        // Degenerate upper bounds collapse to 1.
        assert_eq!(rng.pick(1), 1);
        assert_eq!(rng.pick(0), 1);
    }

    #[test]
    fn scripted_random_replays_then_defaults() {
        let mut rng = ScriptedRandom::new([4, 2]);
        assert_eq!(rng.pick(6), 4);
        assert_eq!(rng.pick(6), 2);
        assert_eq!(rng.pick(6), 1);
    }
}
