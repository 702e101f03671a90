//! Error types for the simulation core
//!
//! There is no I/O inside the tick, so nothing here is retryable: bad bodies
//! are rejected at construction and a failed separation check is a resolver
//! bug. Config loading is the only fallible boundary with the outside world.

use thiserror::Error;

/// Rejected body construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyError {
    #[error("invalid body: radius {radius} and mass {mass} must both be finite and > 0")]
    InvalidConstruction { radius: f64, mass: f64 },
}

/// Collision resolver invariant failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    #[error("bodies {a} and {b} still overlap after de-overlap: distance {distance}, expected {expected}")]
    InvariantViolation {
        a: u32,
        b: u32,
        distance: f64,
        expected: f64,
    },
}

/// Config loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Body(#[from] BodyError),
}
