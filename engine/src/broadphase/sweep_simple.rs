use super::BroadPhase;
use crate::aabb::Aabb;
use crate::particle::Particle;

/// Single-axis sweep-and-prune (§4.2.5). The x-ordering is rebuilt every tick by
/// insertion sort over a persisted index order, which stays near-linear since
/// particle motion rarely reorders the x-axis much tick to tick.
pub struct SweepPruneSimple {
    order: Vec<usize>,
}

impl SweepPruneSimple {
    pub fn new() -> Self {
        SweepPruneSimple { order: Vec::new() }
    }
}

impl Default for SweepPruneSimple {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadPhase for SweepPruneSimple {
    fn candidate_pairs(&mut self, particles: &[Particle]) -> Vec<(usize, usize)> {
        let n = particles.len();
        let aabbs: Vec<Aabb> = particles.iter().map(Aabb::from_particle).collect();

        if self.order.len() != n {
            self.order = (0..n).collect();
        }

        for i in 1..n {
            let mut j = i;
            while j > 0 && aabbs[self.order[j - 1]].min.x > aabbs[self.order[j]].min.x {
                self.order.swap(j - 1, j);
                j -= 1;
            }
        }

        let mut active: Vec<usize> = Vec::new();
        let mut pairs = Vec::new();
        for &idx in &self.order {
            active.retain(|&a| aabbs[a].max.x >= aabbs[idx].min.x);
            for &a in &active {
                pairs.push(if a < idx { (a, idx) } else { (idx, a) });
            }
            active.push(idx);
        }
        pairs
    }

    fn name(&self) -> &'static str {
        "sweep_prune_simple"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    fn particle(id: i64, x: f64) -> Particle {
        Particle::new(id, 1.0, 1.0, Vec3::new(x, 0.0, 0.0), Vec3::ZERO)
    }

    #[test]
    fn test_overlapping_boxes_are_candidates() {
        let particles = vec![particle(0, 0.0), particle(1, 1.5)];
        let pairs = SweepPruneSimple::new().candidate_pairs(&particles);
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn test_far_apart_boxes_not_candidates() {
        let particles = vec![particle(0, 0.0), particle(1, 1000.0)];
        let pairs = SweepPruneSimple::new().candidate_pairs(&particles);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_each_pair_emitted_once() {
        let particles: Vec<Particle> = (0..10).map(|i| particle(i, (i as f64) * 0.5)).collect();
        let mut strategy = SweepPruneSimple::new();
        let pairs = strategy.candidate_pairs(&particles);
        let mut seen = std::collections::HashSet::new();
        for p in &pairs {
            assert!(seen.insert(*p));
        }
    }
}
