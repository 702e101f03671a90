//! Circular rigid bodies
//!
//! Player, asteroids and bullets share one [`Body`] type; the variant data
//! lives in [`BodyKind`]. `position` is the top-left corner of the body's
//! bounding box and is the only stored location; the centre ([`Body::origin`])
//! and the bounding rectangle are derived on demand.

use serde::Serialize;

use super::ship::Ship;
use crate::error::BodyError;
use crate::settings::BoundaryMode;
use crate::vector::Vector2D;

/// Variant-specific state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BodyKind {
    Player(Ship),
    Asteroid,
    Bullet { time_to_live: f64 },
}

/// Payload-free tag for snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BodyTag {
    Player,
    Asteroid,
    Bullet,
}

/// Read-only axis-aligned box, for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A moving circle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Body {
    pub id: u32,
    /// Top-left of the bounding box
    pub position: Vector2D,
    pub velocity: Vector2D,
    radius: f64,
    mass: f64,
    /// Dead bodies are dropped before the next collision pass
    pub alive: bool,
    pub kind: BodyKind,
}

impl Body {
    pub fn new(
        id: u32,
        position: Vector2D,
        velocity: Vector2D,
        radius: f64,
        mass: f64,
        kind: BodyKind,
    ) -> Result<Self, BodyError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(radius) || !valid(mass) {
            return Err(BodyError::InvalidConstruction { radius, mass });
        }
        Ok(Self {
            id,
            position,
            velocity,
            radius,
            mass,
            alive: true,
            kind,
        })
    }

    /// Asteroid centred on `origin`; mass is its circumference
    pub fn asteroid(
        id: u32,
        origin: Vector2D,
        velocity: Vector2D,
        radius: f64,
    ) -> Result<Self, BodyError> {
        let mass = std::f64::consts::TAU * radius;
        let mut body = Self::new(id, Vector2D::ZERO, velocity, radius, mass, BodyKind::Asteroid)?;
        body.set_origin(origin);
        Ok(body)
    }

    /// Bullet centred on `origin`
    pub fn bullet(
        id: u32,
        origin: Vector2D,
        velocity: Vector2D,
        radius: f64,
        mass: f64,
        time_to_live: f64,
    ) -> Result<Self, BodyError> {
        let mut body = Self::new(
            id,
            Vector2D::ZERO,
            velocity,
            radius,
            mass,
            BodyKind::Bullet { time_to_live },
        )?;
        body.set_origin(origin);
        Ok(body)
    }

    /// Player whose bounding box starts at `position`
    pub fn player(
        id: u32,
        position: Vector2D,
        radius: f64,
        mass: f64,
        ship: Ship,
    ) -> Result<Self, BodyError> {
        Self::new(id, position, Vector2D::ZERO, radius, mass, BodyKind::Player(ship))
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Side length of the bounding box
    #[inline]
    pub fn bounding_size(&self) -> f64 {
        2.0 * self.radius
    }

    /// Circle centre in world space
    #[inline]
    pub fn origin(&self) -> Vector2D {
        self.position + Vector2D::splat(self.radius)
    }

    /// Move the body so its centre sits at `origin`
    #[inline]
    pub fn set_origin(&mut self, origin: Vector2D) {
        self.position = origin - Vector2D::splat(self.radius);
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect {
            x: self.position.x,
            y: self.position.y,
            width: self.bounding_size(),
            height: self.bounding_size(),
        }
    }

    pub fn tag(&self) -> BodyTag {
        match self.kind {
            BodyKind::Player(_) => BodyTag::Player,
            BodyKind::Asteroid => BodyTag::Asteroid,
            BodyKind::Bullet { .. } => BodyTag::Bullet,
        }
    }

    pub fn is_asteroid(&self) -> bool {
        matches!(self.kind, BodyKind::Asteroid)
    }

    pub fn ship(&self) -> Option<&Ship> {
        match &self.kind {
            BodyKind::Player(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn ship_mut(&mut self) -> Option<&mut Ship> {
        match &mut self.kind {
            BodyKind::Player(ship) => Some(ship),
            _ => None,
        }
    }

    /// Circle-circle overlap (touching doesn't count)
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        (self.origin() - other.origin()).length() < self.radius + other.radius
    }

    /// Mark for removal at the end of the tick
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Advance position by `velocity * dt`
    #[inline]
    pub fn integrate(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Toroidal wrap
    ///
    /// Once the centre leaves the field it re-enters at the same offset past
    /// the opposite edge, so the sprite straddles that edge. Bodies whose
    /// centre is inside the field are left alone.
    pub fn wrap_walls(&mut self, field_width: f64, field_height: f64) {
        let origin = self.origin();
        let wrapped = Vector2D::new(
            wrap_coord(origin.x, field_width),
            wrap_coord(origin.y, field_height),
        );
        if wrapped != origin {
            self.set_origin(wrapped);
        }
    }

    /// Clamp inside the field and reflect off the edges
    pub fn bounce_walls(&mut self, field_width: f64, field_height: f64) {
        let size = self.bounding_size();

        if self.position.x > field_width - size {
            self.position.x = field_width - size;
            self.velocity.x = -self.velocity.x.abs();
        }
        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity.x = self.velocity.x.abs();
        }
        if self.position.y > field_height - size {
            self.position.y = field_height - size;
            self.velocity.y = -self.velocity.y.abs();
        }
        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity.y = self.velocity.y.abs();
        }
    }

    pub fn apply_boundary(&mut self, mode: BoundaryMode, field_width: f64, field_height: f64) {
        match mode {
            BoundaryMode::Wrap => self.wrap_walls(field_width, field_height),
            BoundaryMode::Bounce => self.bounce_walls(field_width, field_height),
        }
    }
}

#[inline]
fn wrap_coord(center: f64, extent: f64) -> f64 {
    if center > extent || center < 0.0 {
        center.rem_euclid(extent)
    } else {
        center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rock(origin: Vector2D, radius: f64) -> Body {
        Body::asteroid(1, origin, Vector2D::ZERO, radius).unwrap()
    }

    #[test]
    fn test_invalid_construction() {
        let err = Body::new(1, Vector2D::ZERO, Vector2D::ZERO, 0.0, 1.0, BodyKind::Asteroid)
            .unwrap_err();
        assert_eq!(err, BodyError::InvalidConstruction { radius: 0.0, mass: 1.0 });

        assert!(Body::new(1, Vector2D::ZERO, Vector2D::ZERO, 5.0, -1.0, BodyKind::Asteroid).is_err());
        assert!(Body::new(1, Vector2D::ZERO, Vector2D::ZERO, f64::NAN, 1.0, BodyKind::Asteroid).is_err());
        assert!(Body::asteroid(1, Vector2D::ZERO, Vector2D::ZERO, -3.0).is_err());
    }

    #[test]
    fn test_asteroid_mass_and_origin() {
        let a = rock(Vector2D::new(100.0, 50.0), 10.0);
        assert!((a.mass() - 20.0 * std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(a.position, Vector2D::new(90.0, 40.0));
        assert_eq!(a.origin(), Vector2D::new(100.0, 50.0));
        assert_eq!(
            a.bounding_rect(),
            Rect { x: 90.0, y: 40.0, width: 20.0, height: 20.0 }
        );
    }

    #[test]
    fn test_integrate() {
        let mut a = Body::asteroid(1, Vector2D::ZERO, Vector2D::new(0.5, -0.25), 10.0).unwrap();
        a.integrate(4.0);
        assert_eq!(a.origin(), Vector2D::new(2.0, -1.0));
    }

    #[test]
    fn test_wrap_right_edge() {
        let eps = 3.0;
        let mut a = rock(Vector2D::new(640.0 + eps, 100.0), 20.0);
        a.wrap_walls(640.0, 480.0);
        // Centre reappears eps past the left edge; box straddles it
        assert!((a.origin().x - eps).abs() < 1e-12);
        assert!((a.position.x - (-20.0 + eps)).abs() < 1e-12);
        assert_eq!(a.origin().y, 100.0);
    }

    #[test]
    fn test_wrap_low_edges() {
        let mut a = rock(Vector2D::new(-1.0, -2.0), 20.0);
        a.wrap_walls(640.0, 480.0);
        assert!((a.origin().x - 639.0).abs() < 1e-12);
        assert!((a.origin().y - 478.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounce_walls() {
        let mut a = Body::asteroid(1, Vector2D::new(635.0, 240.0), Vector2D::new(1.0, 0.5), 10.0)
            .unwrap();
        a.bounce_walls(640.0, 480.0);
        assert_eq!(a.position.x, 620.0);
        assert_eq!(a.velocity, Vector2D::new(-1.0, 0.5));

        let mut b = Body::asteroid(2, Vector2D::new(100.0, 5.0), Vector2D::new(0.0, -2.0), 10.0)
            .unwrap();
        b.bounce_walls(640.0, 480.0);
        assert_eq!(b.position.y, 0.0);
        assert_eq!(b.velocity.y, 2.0);
    }

    #[test]
    fn test_overlaps_is_strict() {
        let a = rock(Vector2D::new(0.0, 0.0), 10.0);
        let b = rock(Vector2D::new(20.0, 0.0), 10.0);
        let c = rock(Vector2D::new(19.9, 0.0), 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    proptest! {
        #[test]
        fn prop_wrap_leaves_inside_bodies_alone(
            x in 0.0..640.0f64,
            y in 0.0..480.0f64,
            r in 1.0..100.0f64,
        ) {
            let mut a = rock(Vector2D::new(x, y), r);
            let before = a.position;
            a.wrap_walls(640.0, 480.0);
            prop_assert_eq!(a.position, before);
        }

        #[test]
        fn prop_wrap_lands_inside_field(
            x in -2000.0..2000.0f64,
            y in -2000.0..2000.0f64,
            r in 1.0..100.0f64,
        ) {
            let mut a = rock(Vector2D::new(x, y), r);
            a.wrap_walls(640.0, 480.0);
            let o = a.origin();
            prop_assert!(o.x >= -1e-9 && o.x <= 640.0 + 1e-9);
            prop_assert!(o.y >= -1e-9 && o.y <= 480.0 + 1e-9);
        }
    }
}
