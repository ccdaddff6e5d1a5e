//! Shared narrow-phase math (overlap test, collision-event generation and
//! resolution, energy accounting) plus the `Physics` trait that the flat and
//! orbital variants implement for motion integration. Grounded on §4.1: the
//! three-subclass `Physics` hierarchy in the original source collapses here to
//! one trait for the variant-specific part, plus free functions for the part
//! that never varies between flat/orbital.

mod flat;
mod orbital;

pub use flat::FlatPhysics;
pub use orbital::OrbitalPhysics;

use crate::particle::{Particle, ParticleId};
use ordered_float::OrderedFloat;

/// A detected overlap, pending resolution. `overlap_time` is the continuous-time
/// backup distance computed by `generate_collision`.
#[derive(Clone, Copy, Debug)]
pub struct CollisionEvent {
    pub a: ParticleId,
    pub b: ParticleId,
    pub timestep: i64,
    pub overlap_time: f64,
}

/// Motion integration for one tick. Implementations never touch the narrow-phase
/// math below, which is variant-independent.
pub trait Physics: Send {
    fn update_position_and_velocity(&self, particle: &mut Particle, timestep: i64);

    /// Potential energy contribution of a single particle. Zero for flat physics.
    fn potential_energy(&self, particle: &Particle) -> f64;

    /// `Some` only for `OrbitalPhysics`, which owns a fixed center-of-gravity particle.
    fn center_of_gravity(&self) -> Option<&Particle> {
        None
    }
}

/// `particles_overlap(a, b) <=> |a.pos - b.pos|^2 < (a.r + b.r)^2` (§4.1).
pub fn particles_overlap(a: &Particle, b: &Particle) -> bool {
    let d = a.position - b.position;
    let total_radius = a.radius() + b.radius();
    d.length_squared() < total_radius * total_radius
}

pub fn kinetic_energy(p: &Particle) -> f64 {
    p.kinetic_energy()
}

/// Builds the continuous-time backup estimate for an overlapping pair (§4.1).
/// Returns `None` only in the fully degenerate case of exactly coincident,
/// stationary particles, where no relative-velocity direction exists to back up
/// along; callers treat that as "nothing to resolve yet".
pub fn generate_collision(a: &Particle, b: &Particle, timestep: i64) -> Option<CollisionEvent> {
    let delta_v = a.velocity - b.velocity;
    let delta_p = b.position - a.position;
    let rel_speed = delta_v.length();
    let center_dist = delta_p.length();
    let total_radius = a.radius() + b.radius();

    if rel_speed <= f64::EPSILON || center_dist <= f64::EPSILON {
        return None;
    }

    let cos_c = (delta_v.dot(&delta_p) / (rel_speed * center_dist)).clamp(-1.0, 1.0);
    let angle_c = std::f64::consts::PI - cos_c.acos();

    let sin_a = (center_dist * angle_c.sin() / total_radius).clamp(-1.0, 1.0);
    let angle_a = sin_a.asin();

    let angle_b = std::f64::consts::PI - (angle_a + angle_c);

    let d_sq = center_dist * center_dist + total_radius * total_radius
        - 2.0 * center_dist * total_radius * angle_b.cos();
    let d = d_sq.max(0.0).sqrt();

    let overlap_time = d / rel_speed;

    Some(CollisionEvent {
        a: a.id(),
        b: b.id(),
        timestep,
        overlap_time,
    })
}

/// Elastic collision resolution (§4.1 steps 1-5). Skips silently if the pair is
/// no longer overlapping by the time this event is processed (§7).
pub fn resolve_collision(a: &mut Particle, b: &mut Particle, event: &CollisionEvent) {
    if !particles_overlap(a, b) {
        return;
    }

    let t = event.overlap_time;

    // 1. Back both particles up to the tangent configuration.
    a.position -= a.velocity * t;
    b.position -= b.velocity * t;

    // 2. Unit normal along the line of centers.
    let total_radius = a.radius() + b.radius();
    let normal = (a.position - b.position) / total_radius;

    // 3. Decompose velocities into normal/tangential components.
    let a_normal_mag = a.velocity.dot(&normal);
    let b_normal_mag = b.velocity.dot(&normal);
    let a_normal = normal * a_normal_mag;
    let b_normal = normal * b_normal_mag;
    let a_tangent = a.velocity - a_normal;
    let b_tangent = b.velocity - b_normal;

    // 4. 1D elastic collision along the normal.
    let m_a = a.mass();
    let m_b = b.mass();
    let a_normal_post = ((m_a - m_b) * a_normal_mag + 2.0 * m_b * b_normal_mag) / (m_a + m_b);
    let b_normal_post = ((m_b - m_a) * b_normal_mag + 2.0 * m_a * a_normal_mag) / (m_a + m_b);

    // 5. Recombine and re-advance.
    a.velocity = a_tangent + normal * a_normal_post;
    b.velocity = b_tangent + normal * b_normal_post;
    a.position += a.velocity * t;
    b.position += b.velocity * t;
}

/// Sorts events by **descending** `overlap_time`, per §4.3/§9: the pair that
/// overlapped first (largest backup distance) resolves first. Specified as an
/// explicit sort rather than an inverted `Ord` impl, per §9's design note.
pub fn sort_events_descending(events: &mut [CollisionEvent]) {
    events.sort_by_key(|e| std::cmp::Reverse(OrderedFloat(e.overlap_time)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    fn head_on_pair() -> (Particle, Particle) {
        let a = Particle::new(0, 1.0, 1.0, Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let b = Particle::new(1, 1.0, 1.0, Vec3::new(1.5, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        (a, b)
    }

    #[test]
    fn test_particles_overlap() {
        let (a, b) = head_on_pair();
        assert!(particles_overlap(&a, &b));
        let c = Particle::new(2, 1.0, 1.0, Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        assert!(!particles_overlap(&a, &c));
    }

    #[test]
    fn test_generate_collision_head_on() {
        let (a, b) = head_on_pair();
        let event = generate_collision(&a, &b, 10).expect("should produce an event");
        assert_eq!(event.timestep, 10);
        assert!(event.overlap_time > 0.0);
    }

    #[test]
    fn test_resolve_collision_conserves_kinetic_energy_equal_mass() {
        let (mut a, mut b) = head_on_pair();
        let event = generate_collision(&a, &b, 0).unwrap();
        let ke_before = kinetic_energy(&a) + kinetic_energy(&b);
        resolve_collision(&mut a, &mut b, &event);
        let ke_after = kinetic_energy(&a) + kinetic_energy(&b);
        assert!((ke_before - ke_after).abs() / ke_before < 1e-9);
    }

    #[test]
    fn test_resolve_collision_equal_mass_head_on_exchanges_velocity() {
        let (mut a, mut b) = head_on_pair();
        let event = generate_collision(&a, &b, 0).unwrap();
        resolve_collision(&mut a, &mut b, &event);
        assert!((a.velocity.x - -1.0).abs() < 1e-9);
        assert!((b.velocity.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_collision_symmetric_under_swap() {
        let (mut a1, mut b1) = head_on_pair();
        let event1 = generate_collision(&a1, &b1, 0).unwrap();
        resolve_collision(&mut a1, &mut b1, &event1);

        let (b2, a2) = head_on_pair();
        let mut a2 = a2;
        let mut b2 = b2;
        let event2 = CollisionEvent { a: b2.id(), b: a2.id(), ..event1 };
        resolve_collision(&mut b2, &mut a2, &event2);

        assert!((a1.velocity.x - a2.velocity.x).abs() < 1e-9);
        assert!((b1.velocity.x - b2.velocity.x).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_collision_skips_if_no_longer_overlapping() {
        let (mut a, mut b) = head_on_pair();
        let event = generate_collision(&a, &b, 0).unwrap();
        b.position = Vec3::new(1000.0, 0.0, 0.0);
        let before = (a.velocity, b.velocity);
        resolve_collision(&mut a, &mut b, &event);
        assert_eq!((a.velocity, b.velocity), before);
    }

    #[test]
    fn test_sort_events_descending() {
        let mut events = vec![
            CollisionEvent { a: 0, b: 1, timestep: 0, overlap_time: 0.2 },
            CollisionEvent { a: 0, b: 2, timestep: 0, overlap_time: 0.9 },
            CollisionEvent { a: 0, b: 3, timestep: 0, overlap_time: 0.5 },
        ];
        sort_events_descending(&mut events);
        let times: Vec<f64> = events.iter().map(|e| e.overlap_time).collect();
        assert_eq!(times, vec![0.9, 0.5, 0.2]);
    }
}
