// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use serde::{Deserialize, Serialize};
use warp_math::{MathError, Result, Vector3};

/// Triangle `a, b, c` with an application-defined index.
///
/// The center and the unit normal `(b - a) × (c - a)` are recomputed whenever
/// a vertex changes, so the accessors are plain reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TriangleCapsule", into = "TriangleCapsule")]
pub struct Triangle {
    a: Vector3,
    b: Vector3,
    c: Vector3,
    index: i32,
    center: Vector3,
    normal: Vector3,
}

impl Triangle {
    /// Creates a triangle with index 0.
    pub fn new(a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self::with_index(a, b, c, 0)
    }

    /// Creates a triangle carrying `index`.
    pub fn with_index(a: Vector3, b: Vector3, c: Vector3, index: i32) -> Self {
        let mut out = Self {
            a,
            b,
            c,
            index,
            center: Vector3::ZERO,
            normal: Vector3::ZERO,
        };
        out.refresh();
        out
    }

    fn refresh(&mut self) {
        self.center = (self.a + self.b + self.c) / 3.0;
        self.normal = (self.b - self.a).cross(self.c - self.a).normalize();
    }

    /// First vertex.
    pub const fn a(&self) -> Vector3 {
        self.a
    }

    /// Second vertex.
    pub const fn b(&self) -> Vector3 {
        self.b
    }

    /// Third vertex.
    pub const fn c(&self) -> Vector3 {
        self.c
    }

    /// Application-defined index.
    pub const fn index(&self) -> i32 {
        self.index
    }

    /// Centroid.
    pub const fn center(&self) -> Vector3 {
        self.center
    }

    /// Unit normal; zero for a degenerate triangle.
    pub const fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Vertex `0`, `1` or `2`.
    ///
    /// # Errors
    /// [`MathError::IndexOutOfRange`] for any other index.
    pub fn get(&self, index: usize) -> Result<Vector3> {
        match index {
            0 => Ok(self.a),
            1 => Ok(self.b),
            2 => Ok(self.c),
            _ => Err(MathError::IndexOutOfRange { index, len: 3 }),
        }
    }

    /// Replaces vertex `0`, `1` or `2`.
    ///
    /// # Errors
    /// [`MathError::IndexOutOfRange`] for any other index; `self` is unchanged.
    pub fn set_point(&mut self, index: usize, point: Vector3) -> Result<&mut Self> {
        match index {
            0 => self.a = point,
            1 => self.b = point,
            2 => self.c = point,
            _ => return Err(MathError::IndexOutOfRange { index, len: 3 }),
        }
        self.refresh();
        Ok(self)
    }

    /// Replaces the first vertex.
    pub fn set_a(&mut self, a: Vector3) -> &mut Self {
        self.a = a;
        self.refresh();
        self
    }

    /// Replaces the second vertex.
    pub fn set_b(&mut self, b: Vector3) -> &mut Self {
        self.b = b;
        self.refresh();
        self
    }

    /// Replaces the third vertex.
    pub fn set_c(&mut self, c: Vector3) -> &mut Self {
        self.c = c;
        self.refresh();
        self
    }

    /// Replaces the index.
    pub fn set_index(&mut self, index: i32) -> &mut Self {
        self.index = index;
        self
    }

    /// Copies `source`, index included.
    pub fn set(&mut self, source: &Self) -> &mut Self {
        *self = *source;
        self
    }

    /// `true` when all vertices are finite.
    pub fn is_valid(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}

impl Default for Triangle {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::ZERO, Vector3::ZERO)
    }
}

warp_math::impl_poolable!(Triangle, new = Triangle::default());

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct TriangleCapsule {
    #[serde(rename = "pointA")]
    a: Vector3,
    #[serde(rename = "pointB")]
    b: Vector3,
    #[serde(rename = "pointC")]
    c: Vector3,
    index: i32,
}

impl Default for TriangleCapsule {
    fn default() -> Self {
        Self::from(Triangle::default())
    }
}

impl From<Triangle> for TriangleCapsule {
    fn from(t: Triangle) -> Self {
        Self {
            a: t.a,
            b: t.b,
            c: t.c,
            index: t.index,
        }
    }
}

impl From<TriangleCapsule> for Triangle {
    fn from(c: TriangleCapsule) -> Self {
        Self::with_index(c.a, c.b, c.c, c.index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn right_triangle() -> Triangle {
        Triangle::new(Vector3::ZERO, Vector3::UNIT_X, Vector3::UNIT_Y)
    }

    #[test]
    fn center_and_normal_follow_vertices() {
        let mut t = right_triangle();
        assert!(t.normal().approx_eq(&Vector3::UNIT_Z, 1e-12));
        assert!(t.center().approx_eq(&Vector3::new(1.0 / 3.0, 1.0 / 3.0, 0.0), 1e-12));

        t.set_c(Vector3::NEG_UNIT_Y);
        assert!(t.normal().approx_eq(&Vector3::NEG_UNIT_Z, 1e-12));
        t.set_point(1, Vector3::new(3.0, 0.0, 0.0)).unwrap();
        assert!(t.center().approx_eq(&Vector3::new(1.0, -1.0 / 3.0, 0.0), 1e-12));
    }

    #[test]
    fn index_access_is_checked() {
        let mut t = right_triangle();
        assert_eq!(t.get(1).unwrap(), Vector3::UNIT_X);
        assert_eq!(
            t.get(3),
            Err(MathError::IndexOutOfRange { index: 3, len: 3 })
        );
        let before = t;
        assert!(t.set_point(7, Vector3::ONE).is_err());
        assert_eq!(t, before);
    }

    #[test]
    fn capsule_skips_cached_fields() {
        let mut t = right_triangle();
        t.set_index(4);
        let text = serde_json::to_string(&t).unwrap();
        assert!(text.contains("pointA"));
        assert!(!text.contains("normal"));
        let back: Triangle = serde_json::from_str(&text).unwrap();
        assert_eq!(back, t);
    }
}
