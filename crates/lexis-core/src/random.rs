//! Injectable randomness.
//!
//! The fallback distractor direction and option shuffling are the only random
//! choices in lexis. Both go through [`RandomSource`] so tests can script them.
//!
//! [`ThreadRandom`] is the production source. [`SeededRandom`] and
//! [`ScriptedRandom`] exist for tests and offline simulations that need
//! repeatable output.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of random decisions.
pub trait RandomSource: Send + Sync {
    /// A fair coin flip.
    fn coin_flip(&self) -> bool;

    /// Shuffle a slice of option strings in place.
    fn shuffle(&self, items: &mut [String]);
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn coin_flip(&self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }

    fn shuffle(&self, items: &mut [String]) {
        items.shuffle(&mut rand::thread_rng());
    }
}

/// Reproducible RNG seeded from a fixed value.
///
/// For simulations and tests; servers use [`ThreadRandom`].
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn coin_flip(&self) -> bool {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_bool(0.5),
            Err(poisoned) => poisoned.into_inner().gen_bool(0.5),
        }
    }

    fn shuffle(&self, items: &mut [String]) {
        match self.rng.lock() {
            Ok(mut rng) => items.shuffle(&mut *rng),
            Err(poisoned) => items.shuffle(&mut *poisoned.into_inner()),
        }
    }
}

/// Replays a fixed sequence of coin flips, cycling when exhausted. An empty
/// script always flips `true`.
///
/// Shuffling reverses the slice so callers can still observe a reordering.
/// Test helper only: the output is deterministic by construction.
pub struct ScriptedRandom {
    flips: Mutex<VecDeque<bool>>,
}

impl ScriptedRandom {
    pub fn new(flips: impl IntoIterator<Item = bool>) -> Self {
        Self {
            flips: Mutex::new(flips.into_iter().collect()),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn coin_flip(&self) -> bool {
        let mut flips = match self.flips.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match flips.pop_front() {
            Some(flip) => {
                flips.push_back(flip);
                flip
            }
            None => true,
        }
    }

    fn shuffle(&self, items: &mut [String]) {
        items.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_cycles() {
        let random = ScriptedRandom::new([true, false]);
        assert!(random.coin_flip());
        assert!(!random.coin_flip());
        assert!(random.coin_flip());
    }

    #[test]
    fn test_empty_script_flips_true() {
        let random = ScriptedRandom::new(std::iter::empty());
        assert!(random.coin_flip());
        assert!(random.coin_flip());

        let mut items = vec!["a".to_string(), "b".to_string()];
        random.shuffle(&mut items);
        assert_eq!(items, vec!["b", "a"]);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SeededRandom::new(7);
        let b = SeededRandom::new(7);
        let flips_a: Vec<bool> = (0..16).map(|_| a.coin_flip()).collect();
        let flips_b: Vec<bool> = (0..16).map(|_| b.coin_flip()).collect();
        assert_eq!(flips_a, flips_b);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let random = SeededRandom::new(1);
        let mut items: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        random.shuffle(&mut items);
        items.sort();
        assert_eq!(items, vec!["a", "b", "c", "d"]);
    }
}
