mod collision_queue;
mod position_queue;

pub use collision_queue::CollisionQueue;
pub use position_queue::PositionQueue;
