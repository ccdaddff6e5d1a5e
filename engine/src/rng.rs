use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};
use rand_distr::{Distribution, Gamma};

/// Seeded PRNG used for particle spawning. Wraps `rand`'s `StdRng` so a given seed
/// always reproduces the same spawn sequence, which the equivalence tests in §8
/// depend on.
pub struct Rng {
    inner: StdRng,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng { inner: StdRng::seed_from_u64(seed) }
    }

    pub fn uniform_real(&mut self, min: f64, max: f64) -> f64 {
        self.inner.gen_range(min..max)
    }

    pub fn uniform_bit(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Gamma-distributed real with the given shape/scale, used for the orbital
    /// spawn shell radius (`gamma(1, 2) + R_center`, see §4.3).
    pub fn gamma(&mut self, shape: f64, scale: f64) -> f64 {
        Gamma::new(shape, scale)
            .expect("gamma distribution parameters must be positive")
            .sample(&mut self.inner)
    }

    /// A signed draw from `[min, max]` with a random sign, used for velocity
    /// components during spawning.
    pub fn signed_uniform(&mut self, min: f64, max: f64) -> f64 {
        let magnitude = self.uniform_real(min, max);
        if self.uniform_bit() {
            magnitude
        } else {
            -magnitude
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_reproducible() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..16 {
            assert_eq!(a.uniform_real(0.0, 1.0), b.uniform_real(0.0, 1.0));
        }
    }

    #[test]
    fn test_uniform_real_in_range() {
        let mut rng = Rng::new(7);
        for _ in 0..256 {
            let v = rng.uniform_real(2.0, 5.0);
            assert!((2.0..5.0).contains(&v));
        }
    }

    #[test]
    fn test_gamma_positive() {
        let mut rng = Rng::new(1);
        for _ in 0..64 {
            assert!(rng.gamma(1.0, 2.0) >= 0.0);
        }
    }
}
