use super::Physics;
use crate::particle::Particle;
use crate::vec3::Vec3;

/// Orbital physics: velocity-Verlet integration around a fixed central mass, no
/// walls. `center` is a particle with id `CENTER_OF_GRAVITY_ID` that never moves
/// and is not part of `Simulation::particles()`.
#[derive(Clone, Debug)]
pub struct OrbitalPhysics {
    pub center: Particle,
    pub gravity: f64,
}

impl OrbitalPhysics {
    pub fn new(center: Particle, gravity: f64) -> Self {
        OrbitalPhysics { center, gravity }
    }

    /// `a_new = -(r/|r|) * (G*M) / |r|^2`; zero if `|r| == 0` (§4.1, §7).
    pub fn gravity_acceleration(&self, position: Vec3) -> Vec3 {
        let r = position - self.center.position;
        let dist = r.length();
        if dist == 0.0 {
            return Vec3::ZERO;
        }
        let g_m = self.gravity * self.center.mass();
        -(r / dist) * (g_m / (dist * dist))
    }
}

impl Physics for OrbitalPhysics {
    fn update_position_and_velocity(&self, particle: &mut Particle, timestep: i64) {
        // Matches the original's one-tick lag: `a_new` is read from the
        // particle's position *before* this tick's move, not after (see
        // DESIGN.md's orbital.rs ledger entry).
        let a_old = particle.acceleration;
        let a_new = self.gravity_acceleration(particle.position);
        particle.position += particle.velocity + a_old * 0.5;
        particle.velocity += (a_new + a_old) * 0.5;
        particle.acceleration = a_new;
        particle.timestep = timestep;
    }

    fn potential_energy(&self, particle: &Particle) -> f64 {
        let r = (particle.position - self.center.position).length();
        if r == 0.0 {
            return 0.0;
        }
        -self.gravity * self.center.mass() * particle.mass() / r
    }

    fn center_of_gravity(&self) -> Option<&Particle> {
        Some(&self.center)
    }
}
