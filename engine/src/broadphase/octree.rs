use super::tree::SpatialTree;
use super::BroadPhase;
use crate::particle::Particle;

/// 3D recursive spatial subdivision (§4.2.2), splitting into 8 children instead
/// of the quadtree's 4.
pub struct Octree {
    tree: SpatialTree,
}

impl Octree {
    pub fn new(max_particles_per_level: usize) -> Self {
        Octree { tree: SpatialTree::new(3, max_particles_per_level) }
    }
}

impl BroadPhase for Octree {
    fn candidate_pairs(&mut self, particles: &[Particle]) -> Vec<(usize, usize)> {
        self.tree.candidate_pairs(particles)
    }

    fn name(&self) -> &'static str {
        "octree"
    }
}
