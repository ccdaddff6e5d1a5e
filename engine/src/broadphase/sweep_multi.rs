use std::collections::HashMap;

use super::{pair_key, BroadPhase};
use crate::aabb::Aabb;
use crate::particle::Particle;

#[derive(Clone, Copy)]
struct Boundary {
    box_index: usize,
    is_upper: bool,
    value: f64,
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Incremental multi-axis sweep-and-prune (§4.2.6). Unlike the other five
/// strategies this one does not rebuild its candidate set from scratch: it
/// maintains a persistent `possible` overlap map across ticks, updating it only
/// at the boundary crossings that an insertion sort's adjacent swaps reveal.
pub struct SweepPruneMulti {
    dims: usize,
    boundaries: Vec<Vec<Boundary>>,
    possible: HashMap<u64, (usize, usize)>,
    initialized: bool,
}

impl SweepPruneMulti {
    pub fn new(dims: usize) -> Self {
        SweepPruneMulti {
            dims,
            boundaries: Vec::new(),
            possible: HashMap::new(),
            initialized: false,
        }
    }

    fn bootstrap(&mut self, particles: &[Particle], aabbs: &[Aabb]) {
        self.boundaries = (0..self.dims)
            .map(|d| {
                let mut bs = Vec::with_capacity(aabbs.len() * 2);
                for i in 0..aabbs.len() {
                    bs.push(Boundary { box_index: i, is_upper: false, value: aabbs[i].min.get(d) });
                    bs.push(Boundary { box_index: i, is_upper: true, value: aabbs[i].max.get(d) });
                }
                bs.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap());
                bs
            })
            .collect();

        self.possible.clear();

        // Single-axis sweep on X seeds the initial candidate set, filtered by
        // full AABB overlap on every active dimension (§4.2.6 Initialization).
        let mut active: Vec<usize> = Vec::new();
        for boundary in &self.boundaries[0] {
            if boundary.is_upper {
                active.retain(|&i| i != boundary.box_index);
            } else {
                for &other in &active {
                    if aabbs[other].overlaps(&aabbs[boundary.box_index], self.dims) {
                        let key = pair_key(particles[other].id(), particles[boundary.box_index].id());
                        self.possible.insert(key, ordered(other, boundary.box_index));
                    }
                }
                active.push(boundary.box_index);
            }
        }

        self.initialized = true;
    }

    fn refresh_and_sweep(&mut self, particles: &[Particle], aabbs: &[Aabb]) {
        for d in 0..self.dims {
            for boundary in self.boundaries[d].iter_mut() {
                boundary.value = if boundary.is_upper {
                    aabbs[boundary.box_index].max.get(d)
                } else {
                    aabbs[boundary.box_index].min.get(d)
                };
            }

            let len = self.boundaries[d].len();
            for i in 1..len {
                let mut j = i;
                while j > 0 && self.boundaries[d][j - 1].value > self.boundaries[d][j].value {
                    let sinking = self.boundaries[d][j];
                    let rising = self.boundaries[d][j - 1];

                    if !sinking.is_upper && rising.is_upper {
                        if aabbs[sinking.box_index].overlaps(&aabbs[rising.box_index], self.dims) {
                            let key =
                                pair_key(particles[sinking.box_index].id(), particles[rising.box_index].id());
                            self.possible.insert(key, ordered(sinking.box_index, rising.box_index));
                        }
                    } else if sinking.is_upper && !rising.is_upper {
                        let key =
                            pair_key(particles[sinking.box_index].id(), particles[rising.box_index].id());
                        self.possible.remove(&key);
                    }

                    self.boundaries[d].swap(j - 1, j);
                    j -= 1;
                }
            }
        }
    }
}

impl BroadPhase for SweepPruneMulti {
    fn candidate_pairs(&mut self, particles: &[Particle]) -> Vec<(usize, usize)> {
        let n = particles.len();
        let aabbs: Vec<Aabb> = particles.iter().map(Aabb::from_particle).collect();

        if !self.initialized || self.boundaries.first().map(|b| b.len()) != Some(n * 2) {
            self.bootstrap(particles, &aabbs);
        } else {
            self.refresh_and_sweep(particles, &aabbs);
        }

        self.possible.values().copied().collect()
    }

    fn name(&self) -> &'static str {
        "sweep_prune_multi"
    }
}
