//! 2D scalar noise sources consumed by the field generator.
//!
//! Any continuous, deterministic function returning values in `[-1, 1]`
//! can drive generation; [`SimplexNoise`] is the default.

use noise::{NoiseFn, Simplex};

/// A continuous 2D noise function returning values in `[-1, 1]`.
pub trait NoiseSource2D: Sync {
    /// Sample the noise at `(x, z)`.
    fn get(&self, x: f64, z: f64) -> f64;
}

/// Simplex noise from the `noise` crate.
#[derive(Clone, Debug)]
pub struct SimplexNoise {
    inner: Simplex,
    seed: u32,
}

impl SimplexNoise {
    /// Seed used when no explicit seed is configured.
    pub const DEFAULT_SEED: u32 = Simplex::DEFAULT_SEED;

    /// Create a simplex source with the given seed.
    pub fn new(seed: u32) -> Self {
        Self {
            inner: Simplex::new(seed),
            seed,
        }
    }

    /// The seed this source was built with.
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for SimplexNoise {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl NoiseSource2D for SimplexNoise {
    fn get(&self, x: f64, z: f64) -> f64 {
        self.inner.get([x, z]).clamp(-1.0, 1.0)
    }
}

impl<F> NoiseSource2D for F
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    fn get(&self, x: f64, z: f64) -> f64 {
        self(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_value() {
        let a = SimplexNoise::new(42);
        let b = SimplexNoise::new(42);
        assert_eq!(a.get(1.25, -3.5), b.get(1.25, -3.5));
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = SimplexNoise::new(1);
        let b = SimplexNoise::new(999);
        let differs = (0..32).any(|i| {
            let x = i as f64 * 0.37 + 0.1;
            (a.get(x, x * 0.5) - b.get(x, x * 0.5)).abs() > 1e-9
        });
        assert!(differs, "different seeds should produce different fields");
    }

    #[test]
    fn test_values_within_unit_range() {
        let n = SimplexNoise::default();
        for i in 0..200 {
            for j in 0..20 {
                let v = n.get(i as f64 * 0.13, j as f64 * 0.29);
                assert!((-1.0..=1.0).contains(&v), "noise value {v} out of range");
            }
        }
    }

    #[test]
    fn test_closure_is_a_noise_source() {
        let constant = |_: f64, _: f64| 0.25;
        assert_eq!(NoiseSource2D::get(&constant, 10.0, 20.0), 0.25);
    }
}
