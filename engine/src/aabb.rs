use crate::particle::Particle;
use crate::vec3::Vec3;

/// Axis-aligned bounding box of a particle. `update()` is explicit: between calls
/// the box may lag the particle it was built from (broad-phase strategies rebuild
/// or refresh their boxes once per tick, not on every particle mutation).
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_particle(p: &Particle) -> Self {
        let r = Vec3::splat(p.radius());
        Aabb {
            min: p.position - r,
            max: p.position + r,
        }
    }

    pub fn update(&mut self, p: &Particle) {
        *self = Aabb::from_particle(p);
    }

    /// Overlap test restricted to the first `dims` axes (2 or 3).
    pub fn overlaps(&self, other: &Aabb, dims: usize) -> bool {
        for d in 0..dims {
            if self.max.get(d) < other.min.get(d) || self.min.get(d) > other.max.get(d) {
                return false;
            }
        }
        true
    }

    pub fn corners(&self, dims: usize) -> Vec<Vec3> {
        let count = 1usize << dims;
        let mut out = Vec::with_capacity(count);
        for mask in 0..count {
            let mut c = Vec3::ZERO;
            for d in 0..dims {
                let lo = mask & (1 << d) == 0;
                c.set(d, if lo { self.min.get(d) } else { self.max.get(d) });
            }
            out.push(c);
        }
        out
    }
}
