use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ordered_float::OrderedFloat;
use tracing::instrument;

use crate::broadphase::{
    BroadPhase, BruteForce, Octree, Quadtree, SpatialHash, SpatialIndex, Strategy,
    SweepPruneMulti, SweepPruneSimple,
};
use crate::config::Config;
use crate::error::EngineError;
use crate::particle::{Particle, ParticleId, CENTER_OF_GRAVITY_ID};
use crate::physics::{
    generate_collision, kinetic_energy, particles_overlap, resolve_collision, CollisionEvent,
    FlatPhysics, OrbitalPhysics, Physics,
};
use crate::position::Position;
use crate::queue::{CollisionQueue, PositionQueue};
use crate::rng::Rng;
use crate::vec3::Vec3;

const MAX_SPAWN_ATTEMPTS: usize = 10_000;

/// The three ways a `Simulation` can be constructed (§6 `new`).
#[derive(Clone, Copy, Debug)]
pub enum SimulationMode {
    Flat2D { width: f64, height: f64 },
    Flat3D { width: f64, height: f64, depth: f64 },
    Orbital { width: f64, height: f64, depth: f64, central_mass: f64 },
}

impl SimulationMode {
    pub fn dims(&self) -> usize {
        match self {
            SimulationMode::Flat2D { .. } => 2,
            SimulationMode::Flat3D { .. } | SimulationMode::Orbital { .. } => 3,
        }
    }

    fn window_size(&self) -> Vec3 {
        match *self {
            SimulationMode::Flat2D { width, height } => Vec3::new(width, height, 0.0),
            SimulationMode::Flat3D { width, height, depth } => Vec3::new(width, height, depth),
            SimulationMode::Orbital { width, height, depth, .. } => Vec3::new(width, height, depth),
        }
    }

    fn max_extent(&self) -> f64 {
        let w = self.window_size();
        w.x.max(w.y).max(w.z)
    }
}

struct Pending {
    i: usize,
    j: usize,
    event: CollisionEvent,
}

/// Owns particles, physics, both queues, and drives the per-tick pipeline
/// (§4.3). The broad-phase strategy is a trait object chosen once at
/// construction, collapsing the original `Algorithm` hierarchy's six
/// subclasses behind one contract (§9).
pub struct Simulation {
    particles: Vec<Particle>,
    physics: Box<dyn Physics>,
    broadphase: Box<dyn BroadPhase>,
    position_queue: Arc<PositionQueue>,
    collisions: Arc<CollisionQueue>,
    running: Arc<AtomicBool>,
    config: Config,
    dims: usize,
    timestep: i64,
    checks: u64,
    system_ke: f64,
    system_pe: f64,
}

impl Simulation {
    pub fn new(
        mode: SimulationMode,
        strategy: Strategy,
        num_particles: usize,
        config: Config,
    ) -> Result<Self, EngineError> {
        if num_particles < config.min_num_particles || num_particles > config.max_num_particles {
            return Err(EngineError::ParticleCountOutOfRange {
                min: config.min_num_particles,
                max: config.max_num_particles,
                actual: num_particles,
            });
        }
        let window = mode.window_size();
        if window.x <= 0.0 || window.y <= 0.0 || (mode.dims() == 3 && window.z <= 0.0) {
            return Err(EngineError::InvalidWindowSize(window.x));
        }

        let dims = mode.dims();
        let physics: Box<dyn Physics> = match mode {
            SimulationMode::Flat2D { width, height } => {
                Box::new(FlatPhysics::new(2, Vec3::new(width, height, 0.0)))
            }
            SimulationMode::Flat3D { width, height, depth } => {
                Box::new(FlatPhysics::new(3, Vec3::new(width, height, depth)))
            }
            SimulationMode::Orbital { width, height, depth, central_mass } => {
                let center = Particle::new(
                    CENTER_OF_GRAVITY_ID,
                    10.0,
                    central_mass,
                    Vec3::new(width / 2.0, height / 2.0, depth / 2.0),
                    Vec3::ZERO,
                );
                Box::new(OrbitalPhysics::new(center, config.gravity))
            }
        };

        let broadphase: Box<dyn BroadPhase> = match strategy {
            Strategy::BruteForce => Box::new(BruteForce::new()),
            Strategy::TreeBased if dims == 2 => Box::new(Quadtree::new(config.max_particles_per_level)),
            Strategy::TreeBased => Box::new(Octree::new(config.max_particles_per_level)),
            Strategy::SpatialHash => Box::new(SpatialHash::new(dims, config.max_particle_radius)),
            Strategy::SpatialIndex => {
                Box::new(SpatialIndex::new(dims, config.max_particle_radius, mode.max_extent()))
            }
            Strategy::SweepSimple => Box::new(SweepPruneSimple::new()),
            Strategy::SweepMulti => Box::new(SweepPruneMulti::new(dims)),
        };

        let mut rng = Rng::new(config.seed);
        let particles = spawn_particles(&mode, num_particles, physics.center_of_gravity(), &config, &mut rng)?;

        let queue_capacity = config.queue_capacity(num_particles);

        Ok(Simulation {
            particles,
            physics,
            broadphase,
            position_queue: Arc::new(PositionQueue::new(queue_capacity)),
            collisions: Arc::new(CollisionQueue::new()),
            running: Arc::new(AtomicBool::new(true)),
            config,
            dims,
            timestep: 0,
            checks: 0,
            system_ke: 0.0,
            system_pe: 0.0,
        })
    }

    /// Runs ticks until `stop()` is called or an internal timestep limit is
    /// reached (§4.3 step 11).
    pub fn run(&mut self) {
        while self.running.load(Ordering::SeqCst) {
            self.step();
        }
    }

    /// Cooperative cancellation (§5): flips `running` and wakes a producer
    /// parked on queue backpressure.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.position_queue.notify_all();
    }

    #[instrument(level = "trace", skip(self))]
    pub fn step(&mut self) {
        if !self.running.load(Ordering::SeqCst) {
            return;
        }

        self.timestep += 1;

        for particle in &mut self.particles {
            self.physics.update_position_and_velocity(particle, self.timestep);
        }

        let candidates = self.broadphase.candidate_pairs(&self.particles);

        let mut pending = Vec::new();
        for (i, j) in candidates {
            self.checks += 1;
            if particles_overlap(&self.particles[i], &self.particles[j]) {
                if let Some(event) = generate_collision(&self.particles[i], &self.particles[j], self.timestep) {
                    pending.push(Pending { i, j, event });
                }
            }
        }

        pending.sort_by_key(|p| std::cmp::Reverse(OrderedFloat(p.event.overlap_time)));

        for p in &pending {
            let (lo, hi) = if p.i < p.j { (p.i, p.j) } else { (p.j, p.i) };
            let (left, right) = self.particles.split_at_mut(hi);
            resolve_collision(&mut left[lo], &mut right[0], &p.event);
        }

        if self.timestep % self.config.alg_speed_scale == 0 {
            for particle in &self.particles {
                let position = Position::new(particle.position, self.timestep);
                self.position_queue.push_tail(particle.id(), position, &self.running);
            }
        }

        self.collisions.push_many(pending.iter().map(|p| p.event));

        self.system_ke = self.particles.iter().map(kinetic_energy).sum();
        self.system_pe = self.particles.iter().map(|p| self.physics.potential_energy(p)).sum();

        if let Some(limit) = self.config.timestep_limit {
            if limit + self.config.lookahead_timesteps * self.config.alg_speed_scale <= self.timestep {
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn center_of_gravity(&self) -> Option<&Particle> {
        self.physics.center_of_gravity()
    }

    pub fn position_queue(&self) -> &Arc<PositionQueue> {
        &self.position_queue
    }

    pub fn collisions(&self) -> &Arc<CollisionQueue> {
        &self.collisions
    }

    /// The mutex guarding the collision queue directly, for consumers that want
    /// to take the lock themselves rather than go through `CollisionQueue`'s
    /// own methods (§6).
    pub fn collision_mutex(&self) -> &std::sync::Mutex<std::collections::VecDeque<CollisionEvent>> {
        self.collisions.mutex()
    }

    pub fn timestep(&self) -> i64 {
        self.timestep
    }

    pub fn system_ke(&self) -> f64 {
        self.system_ke
    }

    pub fn system_pe(&self) -> f64 {
        self.system_pe
    }

    pub fn checks(&self) -> u64 {
        self.checks
    }

    pub fn physics(&self) -> &dyn Physics {
        self.physics.as_ref()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn running_flag(&self) -> &Arc<AtomicBool> {
        &self.running
    }
}

fn random_unit_vector(rng: &mut Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.uniform_real(-1.0, 1.0),
            rng.uniform_real(-1.0, 1.0),
            rng.uniform_real(-1.0, 1.0),
        );
        let len = v.length();
        if len > 1e-6 {
            return v / len;
        }
    }
}

/// A velocity orthogonal to `orbit_vector` with the given magnitude, used for
/// near-circular orbital spawns (§4.3). The original solves for a single fixed
/// axis and can divide by a near-zero component; here we solve for whichever
/// axis has the largest magnitude, the numerically robust generalization of
/// the same idea (§7's clamping policy for degeneracies).
fn orthogonal_velocity(rng: &mut Rng, orbit_vector: Vec3, magnitude: f64) -> Vec3 {
    let abs = [orbit_vector.x.abs(), orbit_vector.y.abs(), orbit_vector.z.abs()];
    let solve_axis = if abs[0] >= abs[1] && abs[0] >= abs[2] {
        0
    } else if abs[1] >= abs[2] {
        1
    } else {
        2
    };

    let mut v = Vec3::new(
        rng.uniform_real(-1.0, 1.0),
        rng.uniform_real(-1.0, 1.0),
        rng.uniform_real(-1.0, 1.0),
    );

    let other_sum: f64 = (0..3)
        .filter(|&d| d != solve_axis)
        .map(|d| orbit_vector.get(d) * v.get(d))
        .sum();
    let denom = orbit_vector.get(solve_axis);
    let solved = if denom.abs() > f64::EPSILON { -other_sum / denom } else { 0.0 };
    v.set(solve_axis, solved);

    v.normalized() * magnitude
}

fn overlaps_any(candidate: &Particle, placed: &[Particle], center: Option<&Particle>) -> bool {
    if let Some(c) = center {
        if particles_overlap(candidate, c) {
            return true;
        }
    }
    placed.iter().any(|p| particles_overlap(candidate, p))
}

/// Rejection-sampling spawn loop (§4.3 "Spawning"): draws a candidate particle,
/// resamples until it overlaps nothing already placed (and not the center of
/// gravity, in orbital mode).
fn spawn_particles(
    mode: &SimulationMode,
    num_particles: usize,
    center: Option<&Particle>,
    config: &Config,
    rng: &mut Rng,
) -> Result<Vec<Particle>, EngineError> {
    let mut particles: Vec<Particle> = Vec::with_capacity(num_particles);

    for index in 0..num_particles {
        let id = index as ParticleId;
        let mut placed = None;

        for _attempt in 0..MAX_SPAWN_ATTEMPTS {
            let radius = rng.uniform_real(config.min_particle_radius, config.max_particle_radius);
            let mass = radius * radius;

            let candidate = match *mode {
                SimulationMode::Flat2D { width, height } => {
                    let position = Vec3::new(
                        rng.uniform_real(radius, width - radius),
                        rng.uniform_real(radius, height - radius),
                        0.0,
                    );
                    let velocity = Vec3::new(
                        rng.signed_uniform(config.min_velocity, config.max_velocity) * config.velocity_multiplier,
                        rng.signed_uniform(config.min_velocity, config.max_velocity) * config.velocity_multiplier,
                        0.0,
                    );
                    Particle::new(id, radius, mass, position, velocity)
                }
                SimulationMode::Flat3D { width, height, depth } => {
                    let position = Vec3::new(
                        rng.uniform_real(radius, width - radius),
                        rng.uniform_real(radius, height - radius),
                        rng.uniform_real(radius, depth - radius),
                    );
                    let velocity = Vec3::new(
                        rng.signed_uniform(config.min_velocity, config.max_velocity) * config.velocity_multiplier,
                        rng.signed_uniform(config.min_velocity, config.max_velocity) * config.velocity_multiplier,
                        rng.signed_uniform(config.min_velocity, config.max_velocity) * config.velocity_multiplier,
                    );
                    Particle::new(id, radius, mass, position, velocity)
                }
                SimulationMode::Orbital { .. } => {
                    let center = center.expect("orbital mode always has a center of gravity");
                    let shell_radius = rng.gamma(1.0, 2.0) + center.radius();
                    let direction = random_unit_vector(rng);
                    let position = center.position + direction * shell_radius;
                    let orbit_vector = position - center.position;
                    let speed = (config.gravity * center.mass() / orbit_vector.length()).sqrt();
                    let velocity = orthogonal_velocity(rng, orbit_vector, speed);
                    Particle::new(id, radius, mass, position, velocity)
                }
            };

            if !overlaps_any(&candidate, &particles, center) {
                placed = Some(candidate);
                break;
            }
        }

        match placed {
            Some(p) => particles.push(p),
            None => {
                return Err(EngineError::SpawnRejectionExhausted { index, attempts: MAX_SPAWN_ATTEMPTS })
            }
        }
    }

    Ok(particles)
}
