//! Collision-detection and resolution engine: six interchangeable broad-phase
//! strategies, discrete overlap detection with continuous backup-time elastic
//! resolution, flat wall-reflection and orbital velocity-Verlet physics, and
//! the bounded producer/consumer queues that feed a renderer or benchmark
//! harness.

pub mod aabb;
pub mod broadphase;
pub mod config;
pub mod error;
pub mod particle;
pub mod physics;
pub mod position;
pub mod queue;
pub mod rng;
pub mod simulation;
pub mod vec3;

pub use aabb::Aabb;
pub use broadphase::{
    BroadPhase, BruteForce, Octree, Quadtree, SpatialHash, SpatialIndex, Strategy,
    SweepPruneMulti, SweepPruneSimple,
};
pub use config::Config;
pub use error::EngineError;
pub use particle::{Particle, ParticleId, CENTER_OF_GRAVITY_ID};
pub use physics::{CollisionEvent, FlatPhysics, OrbitalPhysics, Physics};
pub use position::Position;
pub use queue::{CollisionQueue, PositionQueue};
pub use rng::Rng;
pub use simulation::{Simulation, SimulationMode};
pub use vec3::Vec3;
