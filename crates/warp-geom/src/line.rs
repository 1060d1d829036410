// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Lines through an origin along a direction.
//!
//! [`Line3`] is unbounded, [`Ray3`] starts at its origin, and
//! [`LineSegment3`] is centred on its origin and reaches `extent` along the
//! direction each way. Directions are expected to be unit length.

use serde::{Deserialize, Serialize};
use tracing::trace;
use warp_math::{Pooled, Vector3, EPSILON};

use crate::Plane;

macro_rules! line_accessors {
    ($ty:ident) => {
        impl $ty {
            /// Origin point.
            pub const fn origin(&self) -> Vector3 {
                self.origin
            }

            /// Direction (unit length by convention).
            pub const fn direction(&self) -> Vector3 {
                self.direction
            }

            /// Replaces the origin.
            pub fn set_origin(&mut self, origin: Vector3) -> &mut Self {
                self.origin = origin;
                self
            }

            /// Replaces the direction.
            pub fn set_direction(&mut self, direction: Vector3) -> &mut Self {
                self.direction = direction;
                self
            }

            /// Squared distance from `point` to the closest point on `self`.
            pub fn distance_squared(&self, point: Vector3) -> f64 {
                point.distance_squared(self.closest_point(point))
            }
        }
    };
}

/// Infinite line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Line3 {
    origin: Vector3,
    direction: Vector3,
}

impl Line3 {
    /// Creates a line through `origin` along `direction`.
    pub const fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Closest point on the line to `point`.
    pub fn closest_point(&self, point: Vector3) -> Vector3 {
        let t = self.direction.dot(point - self.origin);
        self.origin + self.direction * t
    }

    /// `true` when origin and direction are finite.
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite() && self.direction.is_finite()
    }
}

impl Default for Line3 {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::UNIT_Z)
    }
}

line_accessors!(Line3);
warp_math::impl_poolable!(Line3, new = Line3::default());

/// Half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ray3 {
    origin: Vector3,
    direction: Vector3,
}

impl Ray3 {
    /// Creates a ray from `origin` along `direction`.
    pub const fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Copies `source`.
    pub fn set(&mut self, source: &Self) -> &mut Self {
        *self = *source;
        self
    }

    /// Closest point on the ray to `point`; the origin when `point` lies
    /// behind it.
    pub fn closest_point(&self, point: Vector3) -> Vector3 {
        let t = self.direction.dot(point - self.origin);
        if t > 0.0 {
            self.origin + self.direction * t
        } else {
            self.origin
        }
    }

    /// Hit location against triangle `a, b, c` (either winding).
    pub fn intersects_triangle(&self, a: Vector3, b: Vector3, c: Vector3) -> Option<Vector3> {
        self.intersect(a, b, c, false)
    }

    /// Hit against triangle `a, b, c` as `(t, w1, w2)`: ray parameter and the
    /// barycentric weights of `b` and `c`.
    pub fn intersects_triangle_planar(
        &self,
        a: Vector3,
        b: Vector3,
        c: Vector3,
    ) -> Option<Vector3> {
        self.intersect(a, b, c, true)
    }

    /// Hit location against quad `a, b, c, d`, tested as triangles `abc` and
    /// `acd`.
    pub fn intersects_quad(&self, a: Vector3, b: Vector3, c: Vector3, d: Vector3) -> Option<Vector3> {
        self.intersect(a, b, c, false)
            .or_else(|| self.intersect(a, c, d, false))
    }

    /// Planar variant of [`intersects_quad`](Self::intersects_quad).
    pub fn intersects_quad_planar(
        &self,
        a: Vector3,
        b: Vector3,
        c: Vector3,
        d: Vector3,
    ) -> Option<Vector3> {
        self.intersect(a, b, c, true)
            .or_else(|| self.intersect(a, c, d, true))
    }

    /// Hit location against a triangle or quad given by its vertices; any
    /// other vertex count never hits.
    pub fn intersects_polygon(&self, vertices: &[Vector3]) -> Option<Vector3> {
        match *vertices {
            [a, b, c] => self.intersects_triangle(a, b, c),
            [a, b, c, d] => self.intersects_quad(a, b, c, d),
            _ => {
                trace!(vertices = vertices.len(), "ray tests only triangles and quads");
                None
            }
        }
    }

    /// Distance from the origin to the hit on `vertices`, or infinity on a
    /// miss.
    pub fn distance_to_primitive(&self, vertices: &[Vector3]) -> f64 {
        self.intersects_polygon(vertices)
            .map_or(f64::INFINITY, |hit| self.origin.distance(hit))
    }

    /// Hit location against `plane`; `None` when parallel or behind the
    /// origin.
    pub fn intersects_plane(&self, plane: &Plane) -> Option<Vector3> {
        let normal = plane.normal();
        let denominator = normal.dot(self.direction);
        if denominator.abs() < EPSILON {
            return None;
        }
        let ratio = (plane.constant() - normal.dot(self.origin)) / denominator;
        if ratio < EPSILON {
            return None;
        }
        Some(self.origin + self.direction * ratio)
    }

    /// Two-sided ray/triangle test on edge cross products.
    fn intersect(&self, a: Vector3, b: Vector3, c: Vector3, planar: bool) -> Option<Vector3> {
        let diff = Pooled::with_value(self.origin - a);
        let edge1 = Pooled::with_value(b - a);
        let edge2 = Pooled::with_value(c - a);
        let norm = Pooled::with_value(edge1.cross(*edge2));

        let mut dir_dot_norm = self.direction.dot(*norm);
        let sign = if dir_dot_norm > EPSILON {
            1.0
        } else if dir_dot_norm < -EPSILON {
            dir_dot_norm = -dir_dot_norm;
            -1.0
        } else {
            return None;
        };

        let w1_num = sign * self.direction.dot(diff.cross(*edge2));
        if w1_num < 0.0 {
            return None;
        }
        let w2_num = sign * self.direction.dot(edge1.cross(*diff));
        if w2_num < 0.0 || w1_num + w2_num > dir_dot_norm {
            return None;
        }
        let diff_dot_norm = -sign * diff.dot(*norm);
        if diff_dot_norm < 0.0 {
            return None;
        }

        let inv = 1.0 / dir_dot_norm;
        let t = diff_dot_norm * inv;
        Some(if planar {
            Vector3::new(t, w1_num * inv, w2_num * inv)
        } else {
            self.origin + self.direction * t
        })
    }

    /// `true` when origin and direction are finite.
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite() && self.direction.is_finite()
    }
}

impl Default for Ray3 {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::UNIT_Z)
    }
}

line_accessors!(Ray3);
warp_math::impl_poolable!(Ray3, new = Ray3::default());

/// Segment centred on `origin`, spanning `extent` along the direction each
/// way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSegment3 {
    origin: Vector3,
    direction: Vector3,
    extent: f64,
}

impl LineSegment3 {
    /// Creates a segment from centre, unit direction and half-length.
    pub const fn new(origin: Vector3, direction: Vector3, extent: f64) -> Self {
        Self {
            origin,
            direction,
            extent,
        }
    }

    /// Segment from `start` to `end`. Coincident endpoints give a zero
    /// extent and a zero direction.
    pub fn from_endpoints(start: Vector3, end: Vector3) -> Self {
        let span = end - start;
        Self::new((start + end) * 0.5, span.normalize(), 0.5 * span.length())
    }

    /// Half-length.
    pub const fn extent(&self) -> f64 {
        self.extent
    }

    /// Replaces the half-length.
    pub fn set_extent(&mut self, extent: f64) -> &mut Self {
        self.extent = extent;
        self
    }

    /// Copies `source`, extent included.
    pub fn set(&mut self, source: &Self) -> &mut Self {
        *self = *source;
        self
    }

    /// `origin + direction * extent`.
    pub fn positive_end(&self) -> Vector3 {
        self.origin + self.direction * self.extent
    }

    /// `origin - direction * extent`.
    pub fn negative_end(&self) -> Vector3 {
        self.origin - self.direction * self.extent
    }

    /// Closest point on the segment to `point`, clamped to the ends.
    pub fn closest_point(&self, point: Vector3) -> Vector3 {
        let t = self.direction.dot(point - self.origin);
        if t <= -self.extent {
            self.negative_end()
        } else if t >= self.extent {
            self.positive_end()
        } else {
            self.origin + self.direction * t
        }
    }

    /// `true` when origin, direction and extent are finite.
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.direction.is_finite() && self.extent.is_finite()
    }
}

impl Default for LineSegment3 {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::UNIT_Z, 0.5)
    }
}

line_accessors!(LineSegment3);
warp_math::impl_poolable!(LineSegment3, new = LineSegment3::default());
