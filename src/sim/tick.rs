//! Per-tick simulation step
//!
//! One call to [`advance`] runs the whole tick in a fixed order:
//! intents -> fire -> steer -> wrap + integrate -> asteroid bounces ->
//! bullet hits -> commit kills/spawns -> death check -> sensors.
//! Kills and spawns from bullet hits are collected first and only applied
//! once every pair has been tested.

use serde::Serialize;

use super::body::{Body, BodyKind};
use super::collision::{Fragment, resolve_elastic, split_asteroid};
use super::ray::{Whisker, cast_whiskers, proximity};
use super::ship::{Ship, steer};
use super::state::{BodyState, PlayerState, World};
use crate::settings::{GameMode, SimConfig};

/// Player intents for a single tick, sampled once at its start
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Engine on
    pub thrust: bool,
    /// -1 rotate left, 1 rotate right, 0 hold heading
    pub rotate: i8,
    /// Fire one bullet this tick
    pub fire: bool,
    /// Rule set for this tick
    pub mode: GameMode,
}

/// Everything a renderer or controller needs after a tick
#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    /// Tick index since the last reset
    pub tick: u64,
    /// Simulated milliseconds since the last reset
    pub time_ms: f64,
    pub mode: GameMode,
    pub player: PlayerState,
    pub asteroids: Vec<BodyState>,
    pub bullets: Vec<BodyState>,
    /// Asteroids destroyed by bullets this tick
    pub score_delta: u32,
    pub player_died: bool,
    pub whiskers: Vec<Whisker>,
    /// `range - distance` per whisker
    pub proximity: Vec<f64>,
}

/// A bullet and the asteroid it destroyed, by index
#[derive(Debug, Clone, Copy)]
struct Hit {
    bullet: usize,
    asteroid: usize,
}

impl World {
    /// Advance by `dt` milliseconds
    pub fn advance(&mut self, input: &TickInput, dt: f64) -> TickResult {
        advance(self, input, dt)
    }
}

/// Advance the world by one tick of `dt` milliseconds
pub fn advance(world: &mut World, input: &TickInput, dt: f64) -> TickResult {
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Ignoring invalid dt {dt}");
        0.0
    };

    world.mode = input.mode;
    world.time_ticks += 1;
    world.time_ms += dt;

    let step = world.config.rotation_step_deg;
    if let Some(ship) = world.player.ship_mut() {
        ship.thrusting = input.thrust;
        ship.set_rotation(input.rotate, step);
    }

    if input.fire {
        if let Err(err) = world.fire() {
            log::error!("Failed to fire: {err}");
        }
    }

    let config = &world.config;
    let mode = world.mode;

    steer(&mut world.player, config, dt);
    move_body(&mut world.player, mode, config, dt);
    for body in world.asteroids.iter_mut().chain(world.bullets.iter_mut()) {
        move_body(body, mode, config, dt);
    }

    resolve_asteroid_pairs(&mut world.asteroids);

    let hits = find_bullet_hits(&world.bullets, &world.asteroids);
    let mut fragments: Vec<Fragment> = Vec::new();
    for hit in &hits {
        let bullet = &world.bullets[hit.bullet];
        let asteroid = &world.asteroids[hit.asteroid];
        fragments.extend(split_asteroid(asteroid, bullet, config));
        log::debug!(
            "Bullet {} destroyed asteroid {} (radius {})",
            bullet.id,
            asteroid.id,
            asteroid.radius()
        );
    }
    for hit in &hits {
        world.bullets[hit.bullet].kill();
        world.asteroids[hit.asteroid].kill();
    }
    let score_delta = hits.len() as u32;
    let reset_on_death = config.reset_on_death;

    world.remove_dead();
    if let Err(err) = world.spawn_fragments(&fragments) {
        log::error!("Failed to spawn fragments: {err}");
    }
    world.normalize_order();

    if let Some(ship) = world.player.ship_mut() {
        ship.score += u64::from(score_delta);
    }

    let player_died = player_killed(world);
    if player_died {
        log::info!(
            "Player died at tick {} with score {}",
            world.time_ticks,
            world.score()
        );
        if reset_on_death {
            if let Err(err) = world.reset() {
                log::error!("Failed to reset world: {err}");
            }
        }
    }

    let range = world.config.whisker_range;
    let whiskers = cast_whiskers(
        &world.player,
        &world.asteroids,
        world.config.whisker_count,
        range,
    );

    TickResult {
        tick: world.time_ticks,
        time_ms: world.time_ms,
        mode: world.mode,
        player: world.player_state(),
        asteroids: world.asteroid_states(),
        bullets: world.bullet_states(),
        score_delta,
        player_died,
        proximity: proximity(&whiskers, range),
        whiskers,
    }
}

/// Boundary, integration and per-kind timers for one body
fn move_body(body: &mut Body, mode: GameMode, config: &SimConfig, dt: f64) {
    body.apply_boundary(config.boundary, config.field_width, config.field_height);
    if mode.integrates(body.is_asteroid()) {
        body.integrate(dt);
    }

    match &mut body.kind {
        BodyKind::Player(ship) => ship.decay_invincibility(dt, config.invincibility_decay),
        BodyKind::Bullet { time_to_live } => {
            *time_to_live -= dt;
            if *time_to_live <= 0.0 {
                body.alive = false;
            }
        }
        BodyKind::Asteroid => {}
    }
}

/// Elastic bounce for every overlapping asteroid pair, in id order
fn resolve_asteroid_pairs(asteroids: &mut [Body]) {
    for j in 1..asteroids.len() {
        let (left, right) = asteroids.split_at_mut(j);
        let b = &mut right[0];
        for a in left.iter_mut() {
            if a.alive && b.alive {
                resolve_elastic(a, b);
            }
        }
    }
}

/// Pair bullets with the asteroids they hit this tick
///
/// Each bullet takes out at most one asteroid and each asteroid is taken out
/// by at most one bullet; earlier ids win.
fn find_bullet_hits(bullets: &[Body], asteroids: &[Body]) -> Vec<Hit> {
    let mut consumed = vec![false; asteroids.len()];
    let mut hits = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        if !bullet.alive {
            continue;
        }
        let target = asteroids
            .iter()
            .zip(&consumed)
            .position(|(a, &taken)| a.alive && !taken && bullet.overlaps(a));
        if let Some(ai) = target {
            consumed[ai] = true;
            hits.push(Hit {
                bullet: bi,
                asteroid: ai,
            });
        }
    }
    hits
}

/// Whether an asteroid kills the player this tick
fn player_killed(world: &World) -> bool {
    if !world.mode.lethal() {
        return false;
    }
    if world.player.ship().is_some_and(Ship::is_invincible) {
        return false;
    }
    world
        .asteroids
        .iter()
        .any(|a| a.alive && a.overlaps(&world.player))
}
