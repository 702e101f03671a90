//! Asteroid Sim - physics and entity core for an arcade Asteroids game
//!
//! Core modules:
//! - `vector`: 2D vector math on top of `glam::DVec2`
//! - `sim`: Deterministic simulation (bodies, collisions, sensors, world tick)
//! - `settings`: Data-driven tuning and game modes
//! - `error`: Construction, invariant and config errors
//!
//! Rendering, input and audio are left to the embedding application; it feeds
//! [`sim::TickInput`] in and reads [`sim::TickResult`] out.

pub mod error;
pub mod settings;
pub mod sim;
pub mod vector;

pub use error::{BodyError, CollisionError, ConfigError};
pub use settings::{BoundaryMode, GameMode, RotationPolicy, SimConfig};
pub use vector::{Vector2D, VectorExt};

/// Default tuning constants (all times in milliseconds, distances in pixels)
pub mod consts {
    /// Nominal frame time for a 60 Hz driver
    pub const FRAME_DT_MS: f64 = 1000.0 / 60.0;

    /// Play-field dimensions
    pub const FIELD_WIDTH: f64 = 1280.0;
    pub const FIELD_HEIGHT: f64 = 960.0;

    /// Asteroid defaults
    pub const ASTEROID_COUNT: usize = 5;
    pub const ASTEROID_RADII: [f64; 4] = [100.0, 90.0, 80.0, 70.0];
    /// Max initial speed per axis (pixels/ms)
    pub const ASTEROID_SPEED: f64 = 0.2;
    /// Asteroids at or above this radius split when shot
    pub const SPLIT_THRESHOLD: f64 = 20.0;
    /// Fragment divergence from the combined direction (degrees)
    pub const SPLIT_ANGLE_DEG: f64 = 15.0;
    /// Share of bullet speed added to the fragments
    pub const SPLIT_SPEED_FRACTION: f64 = 0.1;

    /// Player defaults
    pub const PLAYER_RADIUS: f64 = 30.0;
    pub const PLAYER_MASS: f64 = 1.0;
    /// Thrust can't push the ship past this speed (pixels/ms)
    pub const PLAYER_MAX_SPEED: f64 = 0.7;
    /// Thrust acceleration (pixels/ms²)
    pub const PLAYER_ACCELERATION: f64 = 0.0005;
    /// Heading change per rotation step (degrees)
    pub const PLAYER_ROTATION_STEP_DEG: f64 = 3.5;
    pub const INVINCIBILITY_START: f64 = 200.0;
    /// Invincibility lost per millisecond
    pub const INVINCIBILITY_DECAY: f64 = 0.1;

    /// Bullet defaults
    pub const BULLET_RADIUS: f64 = 2.0;
    pub const BULLET_MASS: f64 = 1.0;
    pub const BULLET_SPEED: f64 = 1.0;
    pub const BULLET_TTL_MS: f64 = 250.0;

    /// Whisker sensor defaults
    pub const WHISKER_COUNT: usize = 36;
    pub const WHISKER_RANGE: f64 = 250.0;

    /// Default world seed
    pub const DEFAULT_SEED: u64 = 2;

    /// Post de-overlap tangency tolerance
    pub const SEPARATION_TOLERANCE: f64 = 1e-10;
    /// Largest field side where f64 coordinates still resolve the tolerance
    pub const MAX_FIELD_SIZE: f64 = 1e5;
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { 180.0 } else { wrapped }
}
