//! Deterministic random source shared by every generation stage.
//!
//! Wraps a ChaCha8 stream so that an identical seed always yields an
//! identical sequence. Independent sub-streams are obtained with
//! [`RandomSource::split`]; there is no other way to fork a stream.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Snapshot of a [`RandomSource`] position.
///
/// `advances` counts the 32-bit words consumed since the source was seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub advances: u64,
}

/// Seeded generator producing integers, floats and gaussians.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Creates a source seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns the seed this source was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Returns a float in [0, 1) built from the top 24 bits of one draw.
    pub fn next_float(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16_777_216.0
    }

    /// Returns a float in [min, max).
    pub fn next_float_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_float() * (max - min)
    }

    /// Returns an integer in [min, max] (inclusive), uniformly distributed.
    ///
    /// # Panics
    /// Panics if `min > max`.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        assert!(min <= max, "next_int: empty range [{}, {}]", min, max);
        self.rng.random_range(min..=max)
    }

    /// Returns a normally distributed value using the Box-Muller transform.
    pub fn next_gaussian(&mut self, mean: f64, stddev: f64) -> f64 {
        let mut u1 = self.next_u32() as f64 / u32::MAX as f64;
        let u2 = self.next_u32() as f64 / u32::MAX as f64;
        if u1 < 1e-15 {
            u1 = 1e-15;
        }
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + z * stddev
    }

    /// Derives an independent child stream.
    ///
    /// Draws one 64-bit value from `self` and seeds a fresh source from it.
    pub fn split(&mut self) -> RandomSource {
        let child_seed = self.next_u64();
        RandomSource::new(child_seed)
    }

    /// Exports the current position as `(seed, advances)`.
    pub fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            advances: self.rng.get_word_pos() as u64,
        }
    }

    /// Rebuilds a source at a previously exported position.
    ///
    /// Equivalent to seeding a fresh source and discarding `advances` words.
    pub fn restore(state: RngState) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(state.seed);
        rng.set_word_pos(state.advances as u128);
        Self {
            seed: state.seed,
            rng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomSource::new(12345);
        let mut b = RandomSource::new(12345);
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        assert_eq!(a.seed(), 12345);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = RandomSource::new(12345);
        let mut b = RandomSource::new(54321);
        let matches = (0..100).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(matches < 5);
    }

    #[test]
    fn test_float_in_unit_interval() {
        let mut rng = RandomSource::new(42);
        for _ in 0..10_000 {
            let v = rng.next_float();
            assert!((0.0..1.0).contains(&v), "{} out of [0, 1)", v);
        }
    }

    #[test]
    fn test_float_range_respects_bounds() {
        let mut rng = RandomSource::new(42);
        for _ in 0..10_000 {
            let v = rng.next_float_range(-10.0, 10.0);
            assert!(v >= -10.0 && v < 10.0);
        }
    }

    #[test]
    fn test_int_range_is_inclusive() {
        let mut rng = RandomSource::new(42);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let v = rng.next_int(1, 6);
            assert!((1..=6).contains(&v));
            seen.insert(v);
        }
        assert_eq!(seen.len(), 6, "all faces of the die should appear");
    }

    #[test]
    fn test_gaussian_has_expected_moments() {
        let mut rng = RandomSource::new(7);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.next_gaussian(3.0, 2.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 3.0).abs() < 0.1, "mean {}", mean);
        assert!((var.sqrt() - 2.0).abs() < 0.1, "stddev {}", var.sqrt());
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_split_children_are_independent() {
        let mut master = RandomSource::new(42);
        let mut child1 = master.split();
        let mut child2 = master.split();

        let values1: HashSet<u32> = (0..100).map(|_| child1.next_u32()).collect();
        let values2: HashSet<u32> = (0..100).map(|_| child2.next_u32()).collect();
        let overlaps = values1.intersection(&values2).count();
        assert!(overlaps < 5);
    }

    #[test]
    fn test_split_is_deterministic() {
        let mut master1 = RandomSource::new(42);
        let mut master2 = RandomSource::new(42);
        let mut child1 = master1.split();
        let mut child2 = master2.split();
        for _ in 0..100 {
            assert_eq!(child1.next_u32(), child2.next_u32());
        }
    }

    #[test]
    fn test_restore_reproduces_future_output() {
        let mut rng = RandomSource::new(99);
        for i in 0..37 {
            match i % 4 {
                0 => {
                    rng.next_u32();
                }
                1 => {
                    rng.next_u64();
                }
                2 => {
                    rng.next_int(-50, 50);
                }
                _ => {
                    rng.next_gaussian(0.0, 1.0);
                }
            }
        }

        let state = rng.state();
        assert_eq!(state.seed, 99);
        let mut restored = RandomSource::restore(state);
        for _ in 0..200 {
            assert_eq!(rng.next_u32(), restored.next_u32());
        }
    }

    #[test]
    fn test_fresh_state_has_no_advances() {
        let rng = RandomSource::new(5);
        assert_eq!(rng.state(), RngState { seed: 5, advances: 0 });
    }
}
