//! Ray casting against circles, and the player's whisker sensors
//!
//! Whiskers are a fan of fixed-length rays cast from the ship's centre,
//! evenly spaced around the heading. Each reports the distance to the nearest
//! asteroid along it, which makes a compact observation vector for whoever is
//! flying the ship.

use serde::Serialize;

use super::body::Body;
use crate::vector::{Vector2D, VectorExt};

/// Distance along the ray `start -> stop` to the first point on the circle
///
/// The direction is normalized, so the result is a plain distance. Returns
/// the nearer non-negative root, else the farther one (ray starts inside),
/// else `0.0` for "no forward hit".
pub fn ray_circle_intersection(
    start: Vector2D,
    stop: Vector2D,
    origin: Vector2D,
    radius: f64,
) -> f64 {
    let d = (stop - start).normalize_or_zero();
    let f = start - origin;

    let a = d.dot(d);
    if a == 0.0 {
        return 0.0;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return 0.0;
    }

    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);
    if t1 >= 0.0 {
        t1
    } else if t2 >= 0.0 {
        t2
    } else {
        0.0
    }
}

/// One sensor ray's reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Whisker {
    /// Offset from the ship heading (degrees)
    pub angle: f64,
    /// Distance to the nearest obstacle, `range` if nothing was hit
    pub distance: f64,
}

/// Cast `count` rays of length `range` around the player's heading
///
/// Ray `i` points `i * 360 / count` degrees from the heading. Bodies that
/// aren't alive are ignored.
pub fn cast_whiskers(player: &Body, obstacles: &[Body], count: usize, range: f64) -> Vec<Whisker> {
    if count == 0 {
        return Vec::new();
    }
    let start = player.origin();
    let heading = player.ship().map_or(super::ship::NOSE_UP, |s| s.direction);
    let spacing = 360.0 / count as f64;

    (0..count)
        .map(|i| {
            let angle = i as f64 * spacing;
            let stop = start + heading.rotate_deg(angle) * range;
            let distance = obstacles
                .iter()
                .filter(|o| o.alive)
                .map(|o| ray_circle_intersection(start, stop, o.origin(), o.radius()))
                .filter(|&t| t > 0.0 && t < range)
                .fold(range, f64::min);
            Whisker { angle, distance }
        })
        .collect()
}

/// `range - distance` per whisker: 0 for clear, growing as obstacles close in
pub fn proximity(whiskers: &[Whisker], range: f64) -> Vec<f64> {
    whiskers.iter().map(|w| range - w.distance).collect()
}
