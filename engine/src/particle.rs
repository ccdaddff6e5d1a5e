use crate::vec3::Vec3;

/// Identifies a particle. `-1` is reserved for the orbital center of gravity and
/// never appears in `Simulation::particles()`.
pub type ParticleId = i64;

pub const CENTER_OF_GRAVITY_ID: ParticleId = -1;

/// A spherical particle. `radius` and `mass` are set at construction and never
/// change afterward; `id` is stable for the particle's lifetime.
#[derive(Clone, Debug)]
pub struct Particle {
    id: ParticleId,
    radius: f64,
    mass: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Only meaningful in orbital mode; flat physics never reads or writes it.
    pub acceleration: Vec3,
    pub timestep: i64,
}

impl Particle {
    pub fn new(id: ParticleId, radius: f64, mass: f64, position: Vec3, velocity: Vec3) -> Self {
        assert!(radius > 0.0, "particle radius must be positive");
        assert!(mass > 0.0, "particle mass must be positive");
        Particle {
            id,
            radius,
            mass,
            position,
            velocity,
            acceleration: Vec3::ZERO,
            timestep: 0,
        }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinetic_energy() {
        let p = Particle::new(0, 1.0, 2.0, Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(p.kinetic_energy(), 0.5 * 2.0 * 25.0);
    }

    #[test]
    #[should_panic]
    fn test_zero_radius_panics() {
        Particle::new(0, 0.0, 1.0, Vec3::ZERO, Vec3::ZERO);
    }
}
