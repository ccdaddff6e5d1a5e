//! Shared recursive spatial subdivision backing both `Quadtree` (dims=2) and
//! `Octree` (dims=3) — §4.2.2 describes one algorithm parameterized by child
//! count (4 vs 8), so the two public strategies are thin wrappers over this.

use std::collections::HashSet;

use crate::aabb::Aabb;
use crate::particle::Particle;
use crate::vec3::Vec3;

#[derive(Clone, Copy)]
struct Region {
    min: Vec3,
    max: Vec3,
}

impl Region {
    fn child_region(&self, dims: usize, pattern: usize) -> Region {
        let mut min = self.min;
        let mut max = self.max;
        for d in 0..dims {
            let mid = (self.min.get(d) + self.max.get(d)) * 0.5;
            if pattern & (1 << d) == 0 {
                max.set(d, mid);
            } else {
                min.set(d, mid);
            }
        }
        Region { min, max }
    }

    /// `Some(child_index)` if `aabb` fits wholly within exactly one child
    /// region; `None` if it straddles a midpoint on any active axis, in which
    /// case it stays at the current node (§4.2.2).
    fn index_fully_containing(&self, aabb: &Aabb, dims: usize) -> Option<usize> {
        let mut pattern = 0usize;
        for d in 0..dims {
            let mid = (self.min.get(d) + self.max.get(d)) * 0.5;
            if aabb.max.get(d) <= mid {
                // lower half: bit stays 0
            } else if aabb.min.get(d) >= mid {
                pattern |= 1 << d;
            } else {
                return None;
            }
        }
        Some(pattern)
    }
}

struct Node {
    region: Region,
    level: usize,
    own: Vec<usize>,
    children: Option<Vec<Node>>,
}

impl Node {
    fn new(region: Region, level: usize) -> Self {
        Node { region, level, own: Vec::new(), children: None }
    }

    fn insert(&mut self, idx: usize, aabbs: &[Aabb], dims: usize, max_per_level: usize, max_levels: usize) {
        self.own.push(idx);

        if self.children.is_none() && self.own.len() > max_per_level && self.level < max_levels {
            let child_count = 1usize << dims;
            self.children = Some(
                (0..child_count)
                    .map(|p| Node::new(self.region.child_region(dims, p), self.level + 1))
                    .collect(),
            );
        }

        if let Some(children) = &mut self.children {
            let to_redistribute = std::mem::take(&mut self.own);
            for pidx in to_redistribute {
                match self.region.index_fully_containing(&aabbs[pidx], dims) {
                    Some(ci) => children[ci].insert(pidx, aabbs, dims, max_per_level, max_levels),
                    None => self.own.push(pidx),
                }
            }
        }
    }

    fn collect_candidates(&self, idx: usize, aabbs: &[Aabb], dims: usize, out: &mut Vec<usize>) {
        for &other in &self.own {
            if other != idx {
                out.push(other);
            }
        }
        if let Some(children) = &self.children {
            if let Some(ci) = self.region.index_fully_containing(&aabbs[idx], dims) {
                children[ci].collect_candidates(idx, aabbs, dims, out);
            }
        }
    }
}

pub struct SpatialTree {
    dims: usize,
    max_particles_per_level: usize,
}

impl SpatialTree {
    pub fn new(dims: usize, max_particles_per_level: usize) -> Self {
        SpatialTree { dims, max_particles_per_level }
    }

    pub fn candidate_pairs(&mut self, particles: &[Particle]) -> Vec<(usize, usize)> {
        let n = particles.len();
        if n == 0 {
            return Vec::new();
        }

        let aabbs: Vec<Aabb> = particles.iter().map(Aabb::from_particle).collect();
        let region = bounding_region(&aabbs, self.dims);
        let max_levels = (n / self.max_particles_per_level.max(1)).max(1);

        let mut root = Node::new(region, 0);
        for idx in 0..n {
            root.insert(idx, &aabbs, self.dims, self.max_particles_per_level, max_levels);
        }

        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for idx in 0..n {
            let mut candidates = Vec::new();
            root.collect_candidates(idx, &aabbs, self.dims, &mut candidates);
            for other in candidates {
                let (a, b) = if idx < other { (idx, other) } else { (other, idx) };
                if seen.insert((a, b)) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

fn bounding_region(aabbs: &[Aabb], dims: usize) -> Region {
    let mut min = aabbs[0].min;
    let mut max = aabbs[0].max;
    for aabb in &aabbs[1..] {
        for d in 0..dims {
            if aabb.min.get(d) < min.get(d) {
                min.set(d, aabb.min.get(d));
            }
            if aabb.max.get(d) > max.get(d) {
                max.set(d, aabb.max.get(d));
            }
        }
    }
    Region { min, max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    fn particle(id: i64, x: f64, y: f64) -> Particle {
        Particle::new(id, 1.0, 1.0, Vec3::new(x, y, 0.0), Vec3::ZERO)
    }

    #[test]
    fn test_finds_overlapping_pair_same_region() {
        let particles = vec![particle(0, 0.0, 0.0), particle(1, 0.5, 0.0)];
        let mut tree = SpatialTree::new(2, 5);
        let pairs = tree.candidate_pairs(&particles);
        assert!(pairs.contains(&(0, 1)));
    }

    #[test]
    fn test_no_duplicate_pairs() {
        let particles: Vec<Particle> = (0..20)
            .map(|i| particle(i, (i as f64) * 0.1, 0.0))
            .collect();
        let mut tree = SpatialTree::new(2, 5);
        let pairs = tree.candidate_pairs(&particles);
        let mut seen = HashSet::new();
        for pair in &pairs {
            assert!(seen.insert(*pair), "duplicate pair {pair:?}");
        }
    }

    #[test]
    fn test_distant_particles_not_candidates() {
        let particles = vec![particle(0, 0.0, 0.0), particle(1, 1000.0, 1000.0)];
        let mut tree = SpatialTree::new(2, 5);
        let pairs = tree.candidate_pairs(&particles);
        assert!(pairs.is_empty());
    }
}
