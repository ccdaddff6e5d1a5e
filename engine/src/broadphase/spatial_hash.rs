use std::collections::{HashMap, HashSet};

use super::{pair_key, BroadPhase};
use crate::aabb::Aabb;
use crate::particle::Particle;

/// Grid-cell hashing (§4.2.3): every corner of a particle's AABB is mapped to an
/// integer cell, each distinct cell is hashed into a bounded number of buckets,
/// and all particles sharing a bucket become candidates. 2D uses the same
/// two-constant mix as the tree/sweep strategies' pair hash; 3D uses a
/// three-constant variant, both grounded on the original spatial-hash mixing
/// function.
pub struct SpatialHash {
    dims: usize,
    cell_size: f64,
}

impl SpatialHash {
    pub fn new(dims: usize, max_particle_radius: f64) -> Self {
        SpatialHash { dims, cell_size: 5.0 * max_particle_radius }
    }

    fn cell_of(&self, corner_x: f64, corner_y: f64, corner_z: f64) -> (i64, i64, i64) {
        let cell = self.cell_size.max(f64::EPSILON);
        (
            (corner_x / cell).floor() as i64,
            (corner_y / cell).floor() as i64,
            (corner_z / cell).floor() as i64,
        )
    }

    fn hash_cell(&self, cell: (i64, i64, i64), capacity: u64) -> u64 {
        let (x, y, z) = cell;
        let hash = if self.dims == 2 {
            (x as u64).wrapping_mul(1_640_531_513) ^ (y as u64).wrapping_mul(2_654_435_789)
        } else {
            (x as u64)
                .wrapping_mul(73_856_093)
                .wrapping_add((y as u64).wrapping_mul(19_349_663))
                .wrapping_add((z as u64).wrapping_mul(83_492_791))
        };
        hash % capacity.max(1)
    }
}

impl BroadPhase for SpatialHash {
    fn candidate_pairs(&mut self, particles: &[Particle]) -> Vec<(usize, usize)> {
        let n = particles.len();
        if n == 0 {
            return Vec::new();
        }
        let capacity = (10 * n + 1) as u64;
        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();

        for (idx, particle) in particles.iter().enumerate() {
            let aabb = Aabb::from_particle(particle);
            let corners = aabb.corners(self.dims);
            let mut visited_cells = HashSet::new();
            for corner in corners {
                let cell = self.cell_of(corner.x, corner.y, corner.z);
                if visited_cells.insert(cell) {
                    let slot = self.hash_cell(cell, capacity);
                    buckets.entry(slot).or_default().push(idx);
                }
            }
        }

        let mut seen_pairs = HashSet::new();
        let mut pairs = Vec::new();
        for bucket in buckets.values() {
            if bucket.len() < 2 {
                continue;
            }
            for i in 0..bucket.len() {
                for j in (i + 1)..bucket.len() {
                    let (a, b) = (bucket[i], bucket[j]);
                    let key = pair_key(particles[a].id(), particles[b].id());
                    if seen_pairs.insert(key) {
                        let ordered = if a < b { (a, b) } else { (b, a) };
                        pairs.push(ordered);
                    }
                }
            }
        }
        pairs
    }

    fn name(&self) -> &'static str {
        "spatial_hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    fn particle(id: i64, x: f64, y: f64) -> Particle {
        Particle::new(id, 1.0, 1.0, Vec3::new(x, y, 0.0), Vec3::ZERO)
    }

    #[test]
    fn test_close_particles_share_a_bucket() {
        let particles = vec![particle(0, 0.0, 0.0), particle(1, 0.5, 0.0)];
        let mut hash = SpatialHash::new(2, 1.0);
        let pairs = hash.candidate_pairs(&particles);
        assert!(pairs.contains(&(0, 1)));
    }

    #[test]
    fn test_far_particles_not_candidates() {
        let particles = vec![particle(0, 0.0, 0.0), particle(1, 10_000.0, 10_000.0)];
        let mut hash = SpatialHash::new(2, 1.0);
        assert!(hash.candidate_pairs(&particles).is_empty());
    }

    #[test]
    fn test_no_duplicate_pairs_across_corners() {
        let particles: Vec<Particle> = (0..30)
            .map(|i| particle(i, (i as f64) * 0.3, 0.0))
            .collect();
        let mut hash = SpatialHash::new(2, 1.0);
        let pairs = hash.candidate_pairs(&particles);
        let mut seen = HashSet::new();
        for p in &pairs {
            assert!(seen.insert(*p));
        }
    }
}
