//! 2D vector math
//!
//! `Vector2D` is glam's `DVec2`: a `Copy` value type, so every operation
//! yields a new vector. glam already provides add/sub/scale, `dot`, `length`,
//! `perp` (counter-clockwise 90°) and `normalize_or_zero`, which leaves the
//! zero vector untouched. [`VectorExt`] adds the degree-based rotations and
//! the signed angle the ship heading is built on.

use glam::DVec2;

/// 2D vector in world space (y grows downward, like screen space)
pub type Vector2D = DVec2;

/// Rotation and angle helpers in degrees
pub trait VectorExt {
    /// Rotate by `theta` degrees with the standard rotation matrix
    fn rotate_deg(self, theta: f64) -> Self;

    /// Rotate by `theta` degrees around `origin`
    fn rotate_deg_about(self, theta: f64, origin: Self) -> Self;

    /// Signed angle from `self` to `other` in degrees, in (-180, 180]
    ///
    /// Positive when `other` lies in the direction `rotate_deg` turns for a
    /// positive angle.
    fn signed_angle_deg(self, other: Self) -> f64;

    /// `x1*y2 - x2*y1`
    fn determinant(self, other: Self) -> f64;
}

impl VectorExt for DVec2 {
    #[inline]
    fn rotate_deg(self, theta: f64) -> Self {
        let (sin, cos) = theta.to_radians().sin_cos();
        DVec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn rotate_deg_about(self, theta: f64, origin: Self) -> Self {
        (self - origin).rotate_deg(theta) + origin
    }

    #[inline]
    fn signed_angle_deg(self, other: Self) -> f64 {
        self.determinant(other).atan2(self.dot(other)).to_degrees()
    }

    #[inline]
    fn determinant(self, other: Self) -> f64 {
        self.x * other.y - other.x * self.y
    }
}
