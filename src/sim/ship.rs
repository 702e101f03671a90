//! Player ship kinematics
//!
//! The ship is a [`Body`] whose kind carries a [`Ship`]: heading, rotation
//! input, thrust flag, invincibility timer and score. Thrust and rotation are
//! layered on top of the shared body integration.

use serde::Serialize;

use super::body::{Body, BodyKind};
use crate::settings::SimConfig;
use crate::vector::{Vector2D, VectorExt};

/// Heading the ship spawns with, and the axis its angle is measured from
pub const NOSE_UP: Vector2D = Vector2D::new(0.0, -1.0);

/// Player-specific state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ship {
    /// Unit heading
    pub direction: Vector2D,
    /// Signed degrees per rotation step (0 when not rotating)
    pub rotation_rate: f64,
    pub thrusting: bool,
    /// While > 0 asteroids can't kill the ship
    pub invincibility: f64,
    pub score: u64,
}

impl Ship {
    pub fn new(invincibility: f64) -> Self {
        Self {
            direction: NOSE_UP,
            rotation_rate: 0.0,
            thrusting: false,
            invincibility,
            score: 0,
        }
    }

    /// Set rotation from an input sign: -1 left, 1 right, 0 stop
    pub fn set_rotation(&mut self, sign: i8, step_deg: f64) {
        self.rotation_rate = step_deg * f64::from(sign.signum());
    }

    /// Signed heading in degrees relative to nose-up, in (-180, 180]
    pub fn heading_degrees(&self) -> f64 {
        NOSE_UP.signed_angle_deg(self.direction)
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }

    /// Count invincibility down, never below zero
    pub fn decay_invincibility(&mut self, dt: f64, decay: f64) {
        if self.invincibility > 0.0 {
            self.invincibility = (self.invincibility - dt * decay).max(0.0);
        }
    }
}

/// Apply the ship's rotation and thrust to a player body for one tick
///
/// Thrust is skipped outright when it would take the ship to `max_speed` or
/// beyond, so coasting below the cap is unaffected and thrust never crosses it.
pub fn steer(body: &mut Body, config: &SimConfig, dt: f64) {
    let BodyKind::Player(ship) = &mut body.kind else {
        return;
    };

    if ship.rotation_rate != 0.0 {
        let angle = config.rotation_angle(ship.rotation_rate, dt);
        ship.direction = ship.direction.rotate_deg(angle).normalize_or_zero();
    }

    if ship.thrusting {
        let dv = ship.direction * (config.acceleration * dt);
        if (body.velocity + dv).length() < config.max_speed {
            body.velocity += dv;
        }
    }
}

/// Nose of the ship in world space, where bullets spawn
///
/// The top-centre of the bounding box rotated by the heading around the box
/// centre.
pub fn cannon(body: &Body) -> Vector2D {
    let r = body.radius();
    let heading = body.ship().map_or(0.0, Ship::heading_degrees);
    body.position + Vector2D::new(r, 0.0).rotate_deg_about(heading, Vector2D::splat(r))
}

/// Velocity of a bullet fired from the ship right now
pub fn muzzle_velocity(body: &Body, bullet_speed: f64) -> Vector2D {
    let direction = body.ship().map_or(NOSE_UP, |s| s.direction);
    direction * bullet_speed + body.velocity
}
