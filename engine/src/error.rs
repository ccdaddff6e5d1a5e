use thiserror::Error;

/// Invalid-input errors (§7). Numerical degeneracies are not represented here;
/// they are handled inline by clamping since the spec treats them as non-fatal.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("dimensions must be 2 or 3, got {0}")]
    InvalidDimensions(i64),

    #[error("strategy must be 0-5, got {0}")]
    InvalidStrategy(i64),

    #[error("numParticles must be in [{min}, {max}], got {actual}")]
    ParticleCountOutOfRange { min: usize, max: usize, actual: usize },

    #[error("window size must be positive, got {0}")]
    InvalidWindowSize(f64),

    #[error(
        "could not place particle {index} without overlap after {attempts} attempts; \
         box is too small or too crowded for the requested radius range"
    )]
    SpawnRejectionExhausted { index: usize, attempts: usize },
}
