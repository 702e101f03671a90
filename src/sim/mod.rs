//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - dt supplied by the caller, no clocks
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, input or audio dependencies

pub mod body;
pub mod collision;
pub mod ray;
pub mod ship;
pub mod state;
pub mod tick;

pub use body::{Body, BodyKind, BodyTag, Rect};
pub use collision::{
    Contact, Fragment, contact, elastic_velocities, resolve_elastic, split_asteroid,
    verify_separation,
};
pub use ray::{Whisker, cast_whiskers, proximity, ray_circle_intersection};
pub use ship::{NOSE_UP, Ship, cannon, steer};
pub use state::{BodyState, PlayerState, World};
pub use tick::{TickInput, TickResult, advance};
