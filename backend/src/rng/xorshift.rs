//! xorshift64* random number generator
//!
//! Same seed → same sequence. The session owns exactly one generator and
//! threads `&mut RngManager` through the spawner, the behavior resolver and
//! the distraction manager in a fixed order each tick.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seedable deterministic RNG (xorshift64*)
///
/// # Example
/// ```
/// use surveillance_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let roll = rng.next_f64();
/// assert!((0.0..1.0).contains(&roll));
/// let lane = rng.range(0, 3);
/// assert!((0..3).contains(&lane));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed. A zero seed is remapped to 1.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// A non-zero seed drawn from OS entropy, for hosts that did not pick one.
    /// Log it: it is the only way to replay the session.
    pub fn fresh_seed() -> u64 {
        let bits = Uuid::new_v4().as_u128();
        ((bits >> 64) as u64 ^ bits as u64).max(1)
    }

    /// Next raw 64-bit value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform f64 in [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Bernoulli trial: true with probability `p`.
    ///
    /// Always consumes exactly one draw, so call sites stay aligned in the
    /// random stream regardless of `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in [min, max)
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");
        let span = (max - min) as u64;
        min + (self.next_u64() % span) as i64
    }

    /// Uniform integer in [min, max] (both inclusive)
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.range(min as i64, max as i64 + 1) as u32
    }

    /// Uniform float in [min, max)
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (self.next_f64() as f32) * (max - min)
    }

    /// Uniform index into a collection of `len` elements
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick from an empty collection");
        (self.next_u64() % len as u64) as usize
    }

    /// Pick an index according to non-negative integer weights.
    ///
    /// Returns `None` when every weight is zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.next_u64() % total;
        for (i, &w) in weights.iter().enumerate() {
            if roll < w as u64 {
                return Some(i);
            }
            roll -= w as u64;
        }
        None
    }

    /// Current internal state (for telemetry and test reproduction)
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_seeds_differ() {
        let a = RngManager::fresh_seed();
        let b = RngManager::fresh_seed();
        assert_ne!(a, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = RngManager::new(7);
        for _ in 0..1000 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = RngManager::new(99);
        for _ in 0..500 {
            let idx = rng.weighted_index(&[0, 5, 0, 3]).unwrap();
            assert!(idx == 1 || idx == 3);
        }
        assert_eq!(rng.weighted_index(&[0, 0]), None);
    }

    #[test]
    fn test_range_inclusive_hits_both_ends() {
        let mut rng = RngManager::new(4242);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..2000 {
            let v = rng.range_inclusive(40, 80);
            assert!((40..=80).contains(&v));
            saw_min |= v == 40;
            saw_max |= v == 80;
        }
        assert!(saw_min && saw_max);
    }
}
