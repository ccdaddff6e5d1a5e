use super::tree::SpatialTree;
use super::BroadPhase;
use crate::particle::Particle;

/// 2D recursive spatial subdivision (§4.2.2). Cleared and rebuilt every tick.
pub struct Quadtree {
    tree: SpatialTree,
}

impl Quadtree {
    pub fn new(max_particles_per_level: usize) -> Self {
        Quadtree { tree: SpatialTree::new(2, max_particles_per_level) }
    }
}

impl BroadPhase for Quadtree {
    fn candidate_pairs(&mut self, particles: &[Particle]) -> Vec<(usize, usize)> {
        self.tree.candidate_pairs(particles)
    }

    fn name(&self) -> &'static str {
        "quadtree"
    }
}
