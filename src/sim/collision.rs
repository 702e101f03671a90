//! Collision detection and response for circular bodies
//!
//! Two rules live here:
//! - Asteroid vs asteroid: frictionless elastic bounce. Velocities are split
//!   into normal/tangent components, the normal parts go through the 1-D
//!   mass-weighted elastic formula, and the pair is pushed apart to exact
//!   tangency.
//! - Bullet vs asteroid: no bounce. Both die, and a big enough asteroid
//!   leaves two half-size fragments behind.

use serde::Serialize;

use super::body::Body;
use crate::consts::SEPARATION_TOLERANCE;
use crate::error::CollisionError;
use crate::settings::SimConfig;
use crate::vector::{Vector2D, VectorExt};

/// Contact geometry between two overlapping circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from B's centre toward A's centre
    pub normal: Vector2D,
    /// `normal` turned 90° counter-clockwise
    pub tangent: Vector2D,
    /// How far the circles interpenetrate
    pub overlap: f64,
}

/// Overlap test plus contact frame, `None` when the circles don't overlap
///
/// Coincident centres have no defined normal; the x axis is used so the pair
/// still separates.
pub fn contact(a: &Body, b: &Body) -> Option<Contact> {
    let delta = a.origin() - b.origin();
    let distance = delta.length();
    let reach = a.radius() + b.radius();
    if distance >= reach {
        return None;
    }

    let mut normal = delta.normalize_or_zero();
    if normal == Vector2D::ZERO {
        log::warn!("Bodies {} and {} share a centre, separating along +x", a.id, b.id);
        normal = Vector2D::X;
    }

    Some(Contact {
        normal,
        tangent: normal.perp(),
        overlap: reach - distance,
    })
}

/// Post-collision velocities for a frictionless elastic impact along `normal`
///
/// Tangential components are kept, normal components follow the 1-D elastic
/// collision of masses `mass_a` and `mass_b`.
pub fn elastic_velocities(
    normal: Vector2D,
    velocity_a: Vector2D,
    velocity_b: Vector2D,
    mass_a: f64,
    mass_b: f64,
) -> (Vector2D, Vector2D) {
    let tangent = normal.perp();

    let v1n = normal.dot(velocity_a);
    let v2n = normal.dot(velocity_b);
    let v1t = tangent.dot(velocity_a);
    let v2t = tangent.dot(velocity_b);

    let total = mass_a + mass_b;
    let v1n_after = (v1n * (mass_a - mass_b) + 2.0 * mass_b * v2n) / total;
    let v2n_after = (v2n * (mass_b - mass_a) + 2.0 * mass_a * v1n) / total;

    (
        normal * v1n_after + tangent * v1t,
        normal * v2n_after + tangent * v2t,
    )
}

/// Push both bodies half the overlap apart along the contact normal
pub fn separate(a: &mut Body, b: &mut Body, contact: &Contact) {
    let push = contact.normal * (contact.overlap / 2.0);
    a.position += push;
    b.position -= push;
}

/// Check that a separated pair sits at exact tangency
pub fn verify_separation(a: &Body, b: &Body) -> Result<(), CollisionError> {
    let distance = (a.origin() - b.origin()).length();
    let expected = a.radius() + b.radius();
    if (distance - expected).abs() > SEPARATION_TOLERANCE {
        return Err(CollisionError::InvariantViolation {
            a: a.id,
            b: b.id,
            distance,
            expected,
        });
    }
    Ok(())
}

/// Place `b` exactly at tangency with `a`, keeping their current bearing
pub fn force_separation(a: &Body, b: &mut Body) {
    let mut normal = (a.origin() - b.origin()).normalize_or_zero();
    if normal == Vector2D::ZERO {
        normal = Vector2D::X;
    }
    b.set_origin(a.origin() - normal * (a.radius() + b.radius()));
}

/// Resolve an asteroid-asteroid pair in place; returns whether they collided
///
/// # Panics
///
/// In debug builds, if the pair still overlaps after de-overlap. Release
/// builds log the violation and snap the pair to tangency instead.
pub fn resolve_elastic(a: &mut Body, b: &mut Body) -> bool {
    let Some(contact) = contact(a, b) else {
        return false;
    };

    separate(a, b, &contact);

    if let Err(err) = verify_separation(a, b) {
        if cfg!(debug_assertions) {
            panic!("{err}");
        }
        log::error!("{err}; forcing separation");
        force_separation(a, b);
    }

    let (va, vb) = elastic_velocities(contact.normal, a.velocity, b.velocity, a.mass(), b.mass());
    a.velocity = va;
    b.velocity = vb;
    true
}

/// A child asteroid waiting to be spawned
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fragment {
    pub origin: Vector2D,
    pub velocity: Vector2D,
    pub radius: f64,
}

/// Fragments left behind when `bullet` destroys `asteroid`
///
/// Asteroids below the split threshold leave nothing. Otherwise two
/// half-radius children sit half a radius either side of the old centre,
/// across the bullet's path, and fly off 15° either side of the combined
/// asteroid+bullet direction at the asteroid's speed plus a tenth of the
/// bullet's. Momentum is only roughly conserved.
pub fn split_asteroid(asteroid: &Body, bullet: &Body, config: &SimConfig) -> Vec<Fragment> {
    let radius = asteroid.radius();
    if radius < config.split_threshold {
        return Vec::new();
    }

    let tangent = bullet.velocity.normalize_or_zero().perp();
    let offset = tangent * (radius / 2.0);
    let speed =
        asteroid.velocity.length() + bullet.velocity.length() * config.split_speed_fraction;
    let heading = (asteroid.velocity + bullet.velocity).normalize_or_zero();

    [
        (asteroid.origin() + offset, config.split_angle_deg),
        (asteroid.origin() - offset, -config.split_angle_deg),
    ]
    .into_iter()
    .map(|(origin, angle)| Fragment {
        origin,
        velocity: heading.rotate_deg(angle).normalize_or_zero() * speed,
        radius: radius / 2.0,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyKind;
    use proptest::prelude::*;

    fn rock(id: u32, origin: Vector2D, velocity: Vector2D, radius: f64) -> Body {
        Body::asteroid(id, origin, velocity, radius).unwrap()
    }

    fn bullet(origin: Vector2D, velocity: Vector2D) -> Body {
        Body::bullet(99, origin, velocity, 2.0, 1.0, 250.0).unwrap()
    }

    fn momentum(a: &Body, b: &Body) -> Vector2D {
        a.velocity * a.mass() + b.velocity * b.mass()
    }

    #[test]
    fn test_no_contact_when_apart_or_touching() {
        let a = rock(1, Vector2D::new(0.0, 0.0), Vector2D::ZERO, 10.0);
        let b = rock(2, Vector2D::new(20.0, 0.0), Vector2D::ZERO, 10.0);
        assert!(contact(&a, &b).is_none());
    }

    #[test]
    fn test_contact_frame() {
        let a = rock(1, Vector2D::new(15.0, 0.0), Vector2D::ZERO, 10.0);
        let b = rock(2, Vector2D::new(0.0, 0.0), Vector2D::ZERO, 10.0);
        let c = contact(&a, &b).unwrap();
        assert_eq!(c.normal, Vector2D::X);
        assert_eq!(c.tangent, Vector2D::Y);
        assert!((c.overlap - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_head_on_equal_masses_swap() {
        let mut a = rock(1, Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 0.0), 10.0);
        let mut b = rock(2, Vector2D::new(19.0, 0.0), Vector2D::new(-0.5, 0.0), 10.0);
        assert!(resolve_elastic(&mut a, &mut b));
        assert!((a.velocity - Vector2D::new(-0.5, 0.0)).length() < 1e-12);
        assert!((b.velocity - Vector2D::new(1.0, 0.0)).length() < 1e-12);
        assert!(verify_separation(&a, &b).is_ok());
    }

    #[test]
    fn test_glancing_keeps_tangential_component() {
        let mut a = rock(1, Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 1.0), 10.0);
        let mut b = rock(2, Vector2D::new(-19.0, 0.0), Vector2D::ZERO, 10.0);
        resolve_elastic(&mut a, &mut b);
        // Normal is +x: equal masses trade x, y stays with a
        assert!((a.velocity - Vector2D::new(0.0, 1.0)).length() < 1e-12);
        assert!((b.velocity - Vector2D::new(1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_heavy_body_barely_moves() {
        let mut heavy = rock(1, Vector2D::new(0.0, 0.0), Vector2D::ZERO, 100.0);
        let mut light = rock(2, Vector2D::new(105.0, 0.0), Vector2D::new(-1.0, 0.0), 10.0);
        resolve_elastic(&mut heavy, &mut light);
        assert!(heavy.velocity.length() < 0.2);
        assert!(light.velocity.x > 0.0, "light body should rebound");
    }

    #[test]
    fn test_coincident_centres_still_separate() {
        let mut a = rock(1, Vector2D::new(50.0, 50.0), Vector2D::ZERO, 10.0);
        let mut b = rock(2, Vector2D::new(50.0, 50.0), Vector2D::ZERO, 10.0);
        assert!(resolve_elastic(&mut a, &mut b));
        assert!(verify_separation(&a, &b).is_ok());
        assert!((a.origin().x - 60.0).abs() < 1e-12);
        assert!((b.origin().x - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_verify_separation_reports_overlap() {
        let a = rock(1, Vector2D::new(0.0, 0.0), Vector2D::ZERO, 10.0);
        let b = rock(2, Vector2D::new(12.0, 0.0), Vector2D::ZERO, 10.0);
        let err = verify_separation(&a, &b).unwrap_err();
        assert_eq!(
            err,
            CollisionError::InvariantViolation { a: 1, b: 2, distance: 12.0, expected: 20.0 }
        );
    }

    #[test]
    fn test_force_separation_restores_tangency() {
        let a = rock(1, Vector2D::new(0.0, 0.0), Vector2D::ZERO, 10.0);
        let mut b = rock(2, Vector2D::new(3.0, 4.0), Vector2D::ZERO, 10.0);
        force_separation(&a, &mut b);
        assert!(verify_separation(&a, &b).is_ok());
        assert!((b.origin() - Vector2D::new(12.0, 16.0)).length() < 1e-12);
    }

    /// Overlapping pair so far out that f64 can't place them within the
    /// tangency tolerance
    fn far_out_pair() -> (Body, Body) {
        let base = Vector2D::splat(1e12);
        let a = rock(1, base, Vector2D::new(0.1, 0.0), 80.0);
        let b = rock(2, base + Vector2D::new(50.3, 71.9), Vector2D::ZERO, 80.0);
        (a, b)
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "still overlap")]
    fn test_failed_separation_panics_in_debug() {
        let (mut a, mut b) = far_out_pair();
        resolve_elastic(&mut a, &mut b);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_failed_separation_forced_in_release() {
        let (mut a, mut b) = far_out_pair();
        assert!(resolve_elastic(&mut a, &mut b));
        let distance = (a.origin() - b.origin()).length();
        assert!((distance - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_split_large_asteroid() {
        let config = SimConfig::default();
        let a = rock(1, Vector2D::new(200.0, 200.0), Vector2D::ZERO, 70.0);
        let b = bullet(Vector2D::new(140.0, 200.0), Vector2D::new(1.0, 0.0));

        let fragments = split_asteroid(&a, &b, &config);
        assert_eq!(fragments.len(), 2);

        for f in &fragments {
            assert_eq!(f.radius, 35.0);
            assert!(((f.origin - a.origin()).length() - 35.0).abs() < 1e-12);
            assert!((f.velocity.length() - 0.1).abs() < 1e-12);
        }
        // Offsets straddle the bullet path
        assert!((fragments[0].origin - Vector2D::new(200.0, 235.0)).length() < 1e-12);
        assert!((fragments[1].origin - Vector2D::new(200.0, 165.0)).length() < 1e-12);

        // Diverge ±15° from the bullet direction
        let angle0 = Vector2D::X.signed_angle_deg(fragments[0].velocity);
        let angle1 = Vector2D::X.signed_angle_deg(fragments[1].velocity);
        assert!((angle0 - 15.0).abs() < 1e-9);
        assert!((angle1 + 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_threshold() {
        let config = SimConfig::default();
        let b = bullet(Vector2D::ZERO, Vector2D::new(1.0, 0.0));
        let small = rock(1, Vector2D::ZERO, Vector2D::ZERO, 19.9);
        let edge = rock(2, Vector2D::ZERO, Vector2D::ZERO, 20.0);
        assert!(split_asteroid(&small, &b, &config).is_empty());
        assert_eq!(split_asteroid(&edge, &b, &config).len(), 2);
    }

    #[test]
    fn test_split_speed_adds_bullet_share() {
        let config = SimConfig::default();
        let a = rock(1, Vector2D::ZERO, Vector2D::new(0.0, 0.2), 40.0);
        let b = bullet(Vector2D::ZERO, Vector2D::new(0.0, -1.0));
        let fragments = split_asteroid(&a, &b, &config);
        for f in fragments {
            assert!((f.velocity.length() - 0.3).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bullet_kind_is_untouched_by_split() {
        let config = SimConfig::default();
        let a = rock(1, Vector2D::ZERO, Vector2D::ZERO, 40.0);
        let b = bullet(Vector2D::ZERO, Vector2D::new(1.0, 0.0));
        let _ = split_asteroid(&a, &b, &config);
        assert!(matches!(b.kind, BodyKind::Bullet { time_to_live } if time_to_live == 250.0));
    }

    fn body_strategy(id: u32) -> impl Strategy<Value = Body> {
        (
            -500.0..500.0f64,
            -500.0..500.0f64,
            -2.0..2.0f64,
            -2.0..2.0f64,
            1.0..100.0f64,
        )
            .prop_map(move |(x, y, vx, vy, r)| {
                rock(id, Vector2D::new(x, y), Vector2D::new(vx, vy), r)
            })
    }

    proptest! {
        #[test]
        fn prop_momentum_conserved(
            n in (-1.0..1.0f64, -1.0..1.0f64),
            va in (-5.0..5.0f64, -5.0..5.0f64),
            vb in (-5.0..5.0f64, -5.0..5.0f64),
            ma in 0.1..1000.0f64,
            mb in 0.1..1000.0f64,
        ) {
            let normal = Vector2D::new(n.0, n.1).normalize_or_zero();
            prop_assume!(normal != Vector2D::ZERO);
            let va = Vector2D::new(va.0, va.1);
            let vb = Vector2D::new(vb.0, vb.1);
            let (va2, vb2) = elastic_velocities(normal, va, vb, ma, mb);
            let before = va * ma + vb * mb;
            let after = va2 * ma + vb2 * mb;
            prop_assert!((before - after).length() < 1e-9 * (1.0 + before.length()));

            // Elastic: kinetic energy is kept too
            let ke = |v: Vector2D, m: f64| 0.5 * m * v.length_squared();
            let ke_before = ke(va, ma) + ke(vb, mb);
            let ke_after = ke(va2, ma) + ke(vb2, mb);
            prop_assert!((ke_before - ke_after).abs() < 1e-8 * (1.0 + ke_before));
        }

        #[test]
        fn prop_equal_masses_swap_normal_components(
            n in (-1.0..1.0f64, -1.0..1.0f64),
            va in (-5.0..5.0f64, -5.0..5.0f64),
            vb in (-5.0..5.0f64, -5.0..5.0f64),
            m in 0.1..1000.0f64,
        ) {
            let normal = Vector2D::new(n.0, n.1).normalize_or_zero();
            prop_assume!(normal != Vector2D::ZERO);
            let va = Vector2D::new(va.0, va.1);
            let vb = Vector2D::new(vb.0, vb.1);
            let (va2, vb2) = elastic_velocities(normal, va, vb, m, m);
            prop_assert!((normal.dot(va2) - normal.dot(vb)).abs() < 1e-9);
            prop_assert!((normal.dot(vb2) - normal.dot(va)).abs() < 1e-9);
            prop_assert!((normal.perp().dot(va2) - normal.perp().dot(va)).abs() < 1e-9);
        }

        #[test]
        fn prop_resolve_leaves_pair_tangent(a in body_strategy(1), b in body_strategy(2)) {
            let mut a = a;
            let mut b = b;
            let before = momentum(&a, &b);
            if resolve_elastic(&mut a, &mut b) {
                prop_assert!(verify_separation(&a, &b).is_ok());
                let after = momentum(&a, &b);
                prop_assert!((before - after).length() < 1e-9 * (1.0 + before.length()));
            }
        }
    }
}
