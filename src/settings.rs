//! Simulation settings and game modes
//!
//! Everything tunable about the field, ship, asteroids, bullets and sensors
//! lives in [`SimConfig`], loadable from JSON. Missing keys fall back to the
//! defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Rule set applied by the world each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Full rules
    #[default]
    Normal,
    /// Player can't die; collisions still resolve
    GodMode,
    /// No body integrates its position
    FreezeAll,
    /// Only asteroids stop integrating
    FreezeAsteroids,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Normal,
        GameMode::GodMode,
        GameMode::FreezeAll,
        GameMode::FreezeAsteroids,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "Normal",
            GameMode::GodMode => "God mode",
            GameMode::FreezeAll => "Freeze all",
            GameMode::FreezeAsteroids => "Freeze asteroids",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['_', '-'], " ").as_str() {
            "normal" => Some(GameMode::Normal),
            "god" | "god mode" | "godmode" => Some(GameMode::GodMode),
            "freeze all" | "freezeall" => Some(GameMode::FreezeAll),
            "freeze asteroids" | "freezeasteroids" => Some(GameMode::FreezeAsteroids),
            _ => None,
        }
    }

    /// Whether a body of this kind integrates its position this tick
    pub fn integrates(&self, is_asteroid: bool) -> bool {
        match self {
            GameMode::Normal | GameMode::GodMode => true,
            GameMode::FreezeAll => false,
            GameMode::FreezeAsteroids => !is_asteroid,
        }
    }

    /// Whether an asteroid hit can kill the player
    pub fn lethal(&self) -> bool {
        *self == GameMode::Normal
    }
}

/// What happens when a body reaches the field edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoundaryMode {
    /// Toroidal field: leave one edge, re-enter the opposite one
    #[default]
    Wrap,
    /// Reflect off the edges
    Bounce,
}

/// How the rotation step relates to dt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RotationPolicy {
    /// Fixed step per tick regardless of dt
    #[default]
    PerTick,
    /// Step is degrees per millisecond, scaled by dt
    ScaledByDt,
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Field ===
    pub field_width: f64,
    pub field_height: f64,
    pub boundary: BoundaryMode,

    // === Asteroids ===
    pub asteroid_count: usize,
    /// Radius picked uniformly from this list on reset
    pub asteroid_radii: Vec<f64>,
    /// Max initial speed per axis
    pub asteroid_speed: f64,
    pub split_threshold: f64,
    pub split_angle_deg: f64,
    pub split_speed_fraction: f64,

    // === Player ===
    pub player_radius: f64,
    pub player_mass: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    pub rotation_step_deg: f64,
    pub rotation_policy: RotationPolicy,
    pub invincibility_start: f64,
    pub invincibility_decay: f64,
    /// Reset the whole world when the player dies
    pub reset_on_death: bool,

    // === Bullets ===
    pub bullet_radius: f64,
    pub bullet_mass: f64,
    pub bullet_speed: f64,
    pub bullet_ttl: f64,

    // === Sensors ===
    pub whisker_count: usize,
    pub whisker_range: f64,

    // === Determinism ===
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            boundary: BoundaryMode::Wrap,

            asteroid_count: ASTEROID_COUNT,
            asteroid_radii: ASTEROID_RADII.to_vec(),
            asteroid_speed: ASTEROID_SPEED,
            split_threshold: SPLIT_THRESHOLD,
            split_angle_deg: SPLIT_ANGLE_DEG,
            split_speed_fraction: SPLIT_SPEED_FRACTION,

            player_radius: PLAYER_RADIUS,
            player_mass: PLAYER_MASS,
            max_speed: PLAYER_MAX_SPEED,
            acceleration: PLAYER_ACCELERATION,
            rotation_step_deg: PLAYER_ROTATION_STEP_DEG,
            rotation_policy: RotationPolicy::PerTick,
            invincibility_start: INVINCIBILITY_START,
            invincibility_decay: INVINCIBILITY_DECAY,
            reset_on_death: true,

            bullet_radius: BULLET_RADIUS,
            bullet_mass: BULLET_MASS,
            bullet_speed: BULLET_SPEED,
            bullet_ttl: BULLET_TTL_MS,

            whisker_count: WHISKER_COUNT,
            whisker_range: WHISKER_RANGE,

            seed: DEFAULT_SEED,
        }
    }
}

impl SimConfig {
    /// Default config on a field of the given size
    pub fn with_field(width: f64, height: f64) -> Self {
        Self {
            field_width: width,
            field_height: height,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded sim config from {}", path.display());
        Ok(config)
    }

    /// Reject settings the world can't be built from or that break the
    /// simulation's invariants (tangency tolerance, decaying timers,
    /// bounded splitting)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("split_threshold", self.split_threshold),
            ("player_radius", self.player_radius),
            ("player_mass", self.player_mass),
            ("max_speed", self.max_speed),
            ("bullet_radius", self.bullet_radius),
            ("bullet_mass", self.bullet_mass),
            ("bullet_ttl", self.bullet_ttl),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("asteroid_speed", self.asteroid_speed),
            ("split_speed_fraction", self.split_speed_fraction),
            ("acceleration", self.acceleration),
            ("invincibility_start", self.invincibility_start),
            ("invincibility_decay", self.invincibility_decay),
            ("bullet_speed", self.bullet_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be >= 0, got {value}")));
            }
        }

        for (name, value) in [
            ("split_angle_deg", self.split_angle_deg),
            ("rotation_step_deg", self.rotation_step_deg),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
            }
        }

        if self.field_width > MAX_FIELD_SIZE || self.field_height > MAX_FIELD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "field {}x{} exceeds {MAX_FIELD_SIZE} per side",
                self.field_width, self.field_height
            )));
        }
        if self.asteroid_count > 0 && self.asteroid_radii.is_empty() {
            return Err(ConfigError::Invalid(
                "asteroid_radii is empty but asteroid_count > 0".to_string(),
            ));
        }
        if let Some(r) = self.asteroid_radii.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
            return Err(ConfigError::Invalid(format!("asteroid radius must be > 0, got {r}")));
        }
        if self.whisker_count > 0 && !(self.whisker_range.is_finite() && self.whisker_range > 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "whisker_range must be > 0, got {}",
                self.whisker_range
            )));
        }
        Ok(())
    }

    /// Degrees to turn this tick at `rate` degrees per step
    pub fn rotation_angle(&self, rate: f64, dt: f64) -> f64 {
        match self.rotation_policy {
            RotationPolicy::PerTick => rate,
            RotationPolicy::ScaledByDt => rate * dt,
        }
    }
}
