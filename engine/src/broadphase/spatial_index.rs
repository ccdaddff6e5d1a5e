use std::collections::HashSet;

use super::BroadPhase;
use crate::aabb::Aabb;
use crate::particle::Particle;

/// Same cell structure as `SpatialHash`, but cells are addressed directly in a
/// dense vector instead of via a hash bucket (§4.2.4): index `x*rowSize + y` in
/// 2D, `x*rowSize^2 + y*rowSize + z` in 3D. Rebuilt every tick.
pub struct SpatialIndex {
    dims: usize,
    cell_size: f64,
    row_size: usize,
}

impl SpatialIndex {
    pub fn new(dims: usize, max_particle_radius: f64, window_size: f64) -> Self {
        let cell_size = 5.0 * max_particle_radius;
        let row_size = (window_size / cell_size.max(f64::EPSILON)).ceil().max(1.0) as usize;
        SpatialIndex { dims, cell_size, row_size }
    }

    fn cell_coord(&self, value: f64) -> usize {
        let raw = (value / self.cell_size.max(f64::EPSILON)).floor();
        if raw < 0.0 {
            0
        } else {
            (raw as usize).min(self.row_size - 1)
        }
    }

    fn flat_index(&self, x: usize, y: usize, z: usize) -> usize {
        if self.dims == 2 {
            x * self.row_size + y
        } else {
            x * self.row_size * self.row_size + y * self.row_size + z
        }
    }
}

impl BroadPhase for SpatialIndex {
    fn candidate_pairs(&mut self, particles: &[Particle]) -> Vec<(usize, usize)> {
        let n = particles.len();
        if n == 0 {
            return Vec::new();
        }
        let grid_len = if self.dims == 2 {
            self.row_size * self.row_size
        } else {
            self.row_size * self.row_size * self.row_size
        };
        let mut grid: Vec<Vec<usize>> = vec![Vec::new(); grid_len];

        for (idx, particle) in particles.iter().enumerate() {
            let aabb = Aabb::from_particle(particle);
            let corners = aabb.corners(self.dims);
            let mut visited = HashSet::new();
            for corner in corners {
                let x = self.cell_coord(corner.x);
                let y = self.cell_coord(corner.y);
                let z = if self.dims == 3 { self.cell_coord(corner.z) } else { 0 };
                if visited.insert((x, y, z)) {
                    grid[self.flat_index(x, y, z)].push(idx);
                }
            }
        }

        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for cell in &grid {
            if cell.len() < 2 {
                continue;
            }
            for i in 0..cell.len() {
                for j in (i + 1)..cell.len() {
                    let (a, b) = if cell[i] < cell[j] { (cell[i], cell[j]) } else { (cell[j], cell[i]) };
                    if seen.insert((a, b)) {
                        pairs.push((a, b));
                    }
                }
            }
        }
        pairs
    }

    fn name(&self) -> &'static str {
        "spatial_index"
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
    fn test_close_particles_are_candidates() {
        let particles = vec![particle(0, 100.0, 100.0), particle(1, 100.5, 100.0)];
        let mut index = SpatialIndex::new(2, 1.0, 600.0);
        assert!(index.candidate_pairs(&particles).contains(&(0, 1)));
    }

    #[test]
    fn test_far_particles_not_candidates() {
        let particles = vec![particle(0, 10.0, 10.0), particle(1, 590.0, 590.0)];
        let mut index = SpatialIndex::new(2, 1.0, 600.0);
        assert!(index.candidate_pairs(&particles).is_empty());
    }

    #[test]
    fn test_no_duplicate_pairs() {
        let particles: Vec<Particle> = (0..20)
            .map(|i| particle(i, 50.0 + (i as f64) * 0.2, 50.0))
            .collect();
        let mut index = SpatialIndex::new(2, 1.0, 600.0);
        let pairs = index.candidate_pairs(&particles);
        let mut seen = HashSet::new();
        for p in &pairs {
            assert!(seen.insert(*p));
        }
    }
}
