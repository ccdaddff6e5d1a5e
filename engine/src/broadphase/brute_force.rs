use super::BroadPhase;
use crate::particle::Particle;

/// Enumerates all `i < j` pairs. The correctness reference the other five
/// strategies are checked against (§4.2.1, §8 equivalence property).
#[derive(Default)]
pub struct BruteForce;

impl BruteForce {
    pub fn new() -> Self {
        BruteForce
    }
}

impl BroadPhase for BruteForce {
    fn candidate_pairs(&mut self, particles: &[Particle]) -> Vec<(usize, usize)> {
        let n = particles.len();
        let mut pairs = Vec::with_capacity(n * n / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }
        pairs
    }

    fn name(&self) -> &'static str {
        "brute_force"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    #[test]
    fn test_enumerates_all_pairs() {
        let particles: Vec<Particle> = (0..4)
            .map(|i| Particle::new(i, 1.0, 1.0, Vec3::ZERO, Vec3::ZERO))
            .collect();
        let pairs = BruteForce::new().candidate_pairs(&particles);
        assert_eq!(pairs.len(), 6);
        assert!(pairs.contains(&(0, 3)));
    }
}
