//! Asteroid Sim headless driver
//!
//! Runs the simulation at a fixed 60 Hz timestep with a simple autopilot
//! steering off the whisker sensors, then prints a JSON summary.
//!
//! Usage: `asteroid-sim [config.json] [ticks]`

use serde::Serialize;

use asteroid_sim::consts::FRAME_DT_MS;
use asteroid_sim::sim::{TickInput, TickResult, World};
use asteroid_sim::{GameMode, SimConfig, normalize_degrees};

/// Whisker proximity above which the pilot reacts
const DANGER: f64 = 60.0;
/// Ticks between shots
const FIRE_INTERVAL: u64 = 12;

/// Run summary printed at exit
#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    simulated_ms: f64,
    score: u64,
    deaths: u32,
    asteroids: usize,
    bullets: usize,
}

/// Pick intents from the previous tick's sensors
///
/// Turns toward the closest obstacle and shoots at it; thrusts away when
/// something is closing in from behind.
fn autopilot(last: Option<&TickResult>, tick: u64) -> TickInput {
    let mut input = TickInput {
        mode: GameMode::Normal,
        fire: tick % FIRE_INTERVAL == 0,
        ..Default::default()
    };
    let Some(last) = last else {
        return input;
    };

    let closest = last
        .whiskers
        .iter()
        .zip(&last.proximity)
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((whisker, &near)) = closest {
        if near > 0.0 {
            // Whisker angles run clockwise from the nose
            let bearing = normalize_degrees(whisker.angle);
            input.rotate = match bearing {
                b if b.abs() < 5.0 => 0,
                b if b > 0.0 => 1,
                _ => -1,
            };
        }
        let behind = normalize_degrees(whisker.angle).abs() >= 90.0;
        input.thrust = behind && near > DANGER;
    }
    input
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Asteroid Sim (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60);

    let mut world = match World::new(config) {
        Ok(world) => world,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let mut last: Option<TickResult> = None;
    let mut deaths = 0;
    let mut score = 0;
    for tick in 0..ticks {
        let input = autopilot(last.as_ref(), tick);
        let result = world.advance(&input, FRAME_DT_MS);
        score += u64::from(result.score_delta);
        if result.player_died {
            deaths += 1;
        }
        last = Some(result);
    }

    let summary = Summary {
        seed: world.config().seed,
        ticks,
        simulated_ms: ticks as f64 * FRAME_DT_MS,
        score,
        deaths,
        asteroids: world.asteroids.len(),
        bullets: world.bullets.len(),
    };
    log::info!(
        "Finished {} ticks: score {}, deaths {}",
        summary.ticks,
        summary.score,
        summary.deaths
    );

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to encode summary: {err}"),
    }
}
