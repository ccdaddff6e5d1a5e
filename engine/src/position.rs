use crate::vec3::Vec3;

/// A particle's location at a given tick. Immutable once emitted: the producer
/// never mutates a `Position` after handing it to the queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub pos: Vec3,
    pub timestep: i64,
}

impl Position {
    pub fn new(pos: Vec3, timestep: i64) -> Self {
        Position { pos, timestep }
    }
}
