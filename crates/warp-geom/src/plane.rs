// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use serde::{Deserialize, Serialize};
use warp_math::Vector3;

/// Which half-space a point lies in relative to a [`Plane`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Behind the plane (negative pseudo-distance).
    Inside,
    /// In front of the plane (positive pseudo-distance).
    Outside,
    /// Exactly on the plane.
    Neither,
}

/// Plane `normal · p = constant`.
///
/// The normal is expected to be unit length; [`pseudo_distance`](Self::pseudo_distance)
/// is a true signed distance only in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plane {
    normal: Vector3,
    constant: f64,
}

impl Plane {
    /// The XZ plane through the origin (normal +Y).
    pub const XZ: Self = Self::new(Vector3::UNIT_Y, 0.0);
    /// The XY plane through the origin (normal +Z).
    pub const XY: Self = Self::new(Vector3::UNIT_Z, 0.0);
    /// The YZ plane through the origin (normal +X).
    pub const YZ: Self = Self::new(Vector3::UNIT_X, 0.0);

    /// Creates a plane from its normal and constant.
    pub const fn new(normal: Vector3, constant: f64) -> Self {
        Self { normal, constant }
    }

    /// Plane through three counter-clockwise points.
    pub fn from_points(a: Vector3, b: Vector3, c: Vector3) -> Self {
        let mut plane = Self::XZ;
        plane.set_plane_points(a, b, c);
        plane
    }

    /// Plane normal.
    pub const fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Plane constant.
    pub const fn constant(&self) -> f64 {
        self.constant
    }

    /// Replaces the normal.
    pub fn set_normal(&mut self, normal: Vector3) -> &mut Self {
        self.normal = normal;
        self
    }

    /// Replaces the constant.
    pub fn set_constant(&mut self, constant: f64) -> &mut Self {
        self.constant = constant;
        self
    }

    /// Copies `source`.
    pub fn set(&mut self, source: &Self) -> &mut Self {
        *self = *source;
        self
    }

    /// Redefines the plane through `a`, `b`, `c`; the normal is
    /// `(b - a) × (c - a)`, normalized.
    pub fn set_plane_points(&mut self, a: Vector3, b: Vector3, c: Vector3) -> &mut Self {
        self.normal = (b - a).cross(c - a).normalize();
        self.constant = self.normal.dot(a);
        self
    }

    /// `normal · point - constant`.
    pub fn pseudo_distance(&self, point: Vector3) -> f64 {
        self.normal.dot(point) - self.constant
    }

    /// Classifies `point` by the sign of its pseudo-distance.
    pub fn which_side(&self, point: Vector3) -> Side {
        let distance = self.pseudo_distance(point);
        if distance < 0.0 {
            Side::Inside
        } else if distance > 0.0 {
            Side::Outside
        } else {
            Side::Neither
        }
    }

    /// Mirrors a unit vector across the plane.
    pub fn reflect_vector(&self, unit_vector: Vector3) -> Vector3 {
        unit_vector - self.normal * (2.0 * self.normal.dot(unit_vector))
    }

    /// `true` when the normal and constant are finite.
    pub fn is_valid(&self) -> bool {
        self.normal.is_finite() && self.constant.is_finite()
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::XZ
    }
}

warp_math::impl_poolable!(Plane, new = Plane::XZ);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn sides_follow_the_normal() {
        let plane = Plane::new(Vector3::UNIT_Y, 1.0);
        assert_eq!(plane.which_side(Vector3::new(0.0, 2.0, 0.0)), Side::Outside);
        assert_eq!(plane.which_side(Vector3::ZERO), Side::Inside);
        assert_eq!(plane.which_side(Vector3::new(5.0, 1.0, -3.0)), Side::Neither);
        assert_eq!(plane.pseudo_distance(Vector3::new(0.0, 4.0, 0.0)), 3.0);
    }

    #[test]
    fn three_points_define_plane() {
        let plane = Plane::from_points(
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 2.0, 1.0),
            Vector3::new(1.0, 2.0, 0.0),
        );
        assert!(plane.normal().approx_eq(&Vector3::UNIT_Y, 1e-12));
        assert!((plane.constant() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn reflection_flips_normal_component() {
        let r = Plane::XZ.reflect_vector(Vector3::new(1.0, -1.0, 0.0).normalize());
        assert!(r.approx_eq(&Vector3::new(1.0, 1.0, 0.0).normalize(), 1e-12));
    }

    #[test]
    fn validity_and_defaults() {
        assert!(Plane::default().is_valid());
        assert!(!Plane::new(Vector3::UNIT_X, f64::NAN).is_valid());
        let p: Plane = serde_json::from_str(r#"{"constant": 3.0}"#).unwrap();
        assert_eq!(p.normal(), Vector3::UNIT_Y);
        assert_eq!(p.constant(), 3.0);
    }
}
