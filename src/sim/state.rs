//! World state and entity ownership
//!
//! The world exclusively owns the player, the asteroids and the bullets.
//! Nothing holds a reference back into it; the tick borrows it mutably once
//! per step.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::body::{Body, BodyTag};
use super::collision::Fragment;
use super::ship::{self, Ship};
use crate::error::{BodyError, ConfigError};
use crate::settings::{GameMode, SimConfig};
use crate::vector::Vector2D;

/// Render-facing snapshot of one body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyState {
    pub id: u32,
    pub tag: BodyTag,
    /// Top-left of the bounding box
    pub position: Vector2D,
    /// Circle centre
    pub origin: Vector2D,
    pub velocity: Vector2D,
    pub radius: f64,
    pub alive: bool,
}

impl From<&Body> for BodyState {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id,
            tag: body.tag(),
            position: body.position,
            origin: body.origin(),
            velocity: body.velocity,
            radius: body.radius(),
            alive: body.alive,
        }
    }
}

/// Render-facing snapshot of the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerState {
    pub body: BodyState,
    pub direction: Vector2D,
    /// Degrees from nose-up, in (-180, 180]
    pub heading: f64,
    pub thrusting: bool,
    pub invincibility: f64,
    pub score: u64,
}

impl From<&Body> for PlayerState {
    fn from(body: &Body) -> Self {
        let fallback = Ship::new(0.0);
        let ship = body.ship().unwrap_or(&fallback);
        Self {
            body: BodyState::from(body),
            direction: ship.direction,
            heading: ship.heading_degrees(),
            thrusting: ship.thrusting,
            invincibility: ship.invincibility,
            score: ship.score,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) config: SimConfig,
    /// Rule set in effect
    pub mode: GameMode,
    pub player: Body,
    /// Sorted by id
    pub asteroids: Vec<Body>,
    /// Sorted by id
    pub bullets: Vec<Body>,
    /// Ticks since the last reset
    pub time_ticks: u64,
    /// Simulated milliseconds since the last reset
    pub time_ms: f64,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Build and populate a world from `config`
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let mut world = Self::empty(config)?;
        world.reset()?;
        Ok(world)
    }

    /// A world with only the player in it
    pub fn empty(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let player = spawn_player(&config, 1)?;
        Ok(Self {
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            mode: GameMode::Normal,
            player,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            time_ticks: 0,
            time_ms: 0.0,
            next_id: 2,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Re-seed and repopulate: fresh player in the middle, random asteroids,
    /// no bullets. The same seed always yields the same layout.
    pub fn reset(&mut self) -> Result<(), BodyError> {
        self.rng = Pcg32::seed_from_u64(self.config.seed);
        self.next_id = 1;
        self.time_ticks = 0;
        self.time_ms = 0.0;

        let id = self.next_entity_id();
        self.player = spawn_player(&self.config, id)?;
        self.bullets.clear();
        self.asteroids.clear();
        for _ in 0..self.config.asteroid_count {
            let id = self.next_entity_id();
            let Some(asteroid) = random_asteroid(&mut self.rng, &self.config, id)? else {
                break;
            };
            self.asteroids.push(asteroid);
        }

        log::info!(
            "World reset with seed {} ({} asteroids)",
            self.config.seed,
            self.asteroids.len()
        );
        Ok(())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an asteroid centred on `origin`
    pub fn spawn_asteroid(
        &mut self,
        origin: Vector2D,
        velocity: Vector2D,
        radius: f64,
    ) -> Result<u32, BodyError> {
        let id = self.next_entity_id();
        self.asteroids.push(Body::asteroid(id, origin, velocity, radius)?);
        Ok(id)
    }

    /// Add a bullet centred on `origin`
    pub fn spawn_bullet(&mut self, origin: Vector2D, velocity: Vector2D) -> Result<u32, BodyError> {
        let id = self.next_entity_id();
        let bullet = Body::bullet(
            id,
            origin,
            velocity,
            self.config.bullet_radius,
            self.config.bullet_mass,
            self.config.bullet_ttl,
        )?;
        self.bullets.push(bullet);
        Ok(id)
    }

    /// Fire from the ship's cannon
    pub fn fire(&mut self) -> Result<u32, BodyError> {
        let origin = ship::cannon(&self.player);
        let velocity = ship::muzzle_velocity(&self.player, self.config.bullet_speed);
        let id = self.spawn_bullet(origin, velocity)?;
        log::debug!("Bullet {id} fired from ({:.1}, {:.1})", origin.x, origin.y);
        Ok(id)
    }

    /// Spawn split products, all of them or none
    pub fn spawn_fragments(&mut self, fragments: &[Fragment]) -> Result<(), BodyError> {
        let bodies = fragments
            .iter()
            .zip(self.next_id..)
            .map(|(f, id)| Body::asteroid(id, f.origin, f.velocity, f.radius))
            .collect::<Result<Vec<_>, _>>()?;

        self.next_id += bodies.len() as u32;
        for body in bodies {
            log::debug!("Fragment {} spawned with radius {}", body.id, body.radius());
            self.asteroids.push(body);
        }
        Ok(())
    }

    /// Drop dead bodies
    pub fn remove_dead(&mut self) {
        self.asteroids.retain(|a| a.alive);
        self.bullets.retain(|b| b.alive);
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.asteroids.sort_by_key(|a| a.id);
        self.bullets.sort_by_key(|b| b.id);
    }

    pub fn score(&self) -> u64 {
        self.player.ship().map_or(0, |s| s.score)
    }

    pub fn player_state(&self) -> PlayerState {
        PlayerState::from(&self.player)
    }

    pub fn asteroid_states(&self) -> Vec<BodyState> {
        self.asteroids.iter().map(BodyState::from).collect()
    }

    pub fn bullet_states(&self) -> Vec<BodyState> {
        self.bullets.iter().map(BodyState::from).collect()
    }
}

/// Player with its bounding box starting at the field centre
fn spawn_player(config: &SimConfig, id: u32) -> Result<Body, BodyError> {
    let position = Vector2D::new(config.field_width / 2.0, config.field_height / 2.0);
    Body::player(
        id,
        position,
        config.player_radius,
        config.player_mass,
        Ship::new(config.invincibility_start),
    )
}

/// Asteroid with a random radius, position and velocity; `None` if the
/// config has no radii to pick from
fn random_asteroid(
    rng: &mut Pcg32,
    config: &SimConfig,
    id: u32,
) -> Result<Option<Body>, BodyError> {
    let Some(&radius) = config.asteroid_radii.choose(rng) else {
        return Ok(None);
    };
    let speed = config.asteroid_speed;
    let velocity = Vector2D::new(
        rng.random_range(-speed..=speed),
        rng.random_range(-speed..=speed),
    );
    let position = Vector2D::new(
        rng.random_range(0.0..=config.field_width),
        rng.random_range(0.0..=config.field_height),
    );

    let mut asteroid = Body::asteroid(id, Vector2D::ZERO, velocity, radius)?;
    asteroid.position = position;
    Ok(Some(asteroid))
}
