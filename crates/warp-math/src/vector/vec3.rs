// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Three-component double-precision vector.
///
/// * Used for points, directions and per-axis scale factors; the calling
///   context decides which.
/// * `#[repr(C)]` so slices of vectors can be uploaded as tightly packed
///   `f64` triples via [`bytemuck::cast_slice`].
/// * Persists as `{ "x", "y", "z" }` with missing fields defaulting to zero.
#[repr(C)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3 {
    /// `(0, 0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// `(1, 1, 1)`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// `(-1, -1, -1)`.
    pub const NEG_ONE: Self = Self::new(-1.0, -1.0, -1.0);
    /// Unit vector along +X.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along -X.
    pub const NEG_UNIT_X: Self = Self::new(-1.0, 0.0, 0.0);
    /// Unit vector along +Y.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along -Y.
    pub const NEG_UNIT_Y: Self = Self::new(0.0, -1.0, 0.0);
    /// Unit vector along +Z.
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);
    /// Unit vector along -Z.
    pub const NEG_UNIT_Z: Self = Self::new(0.0, 0.0, -1.0);

    /// Overwrites all three components.
    pub fn set(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        *self = Self::new(x, y, z);
        self
    }

    /// Cross product `self × other`.
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Cross product in place.
    pub fn cross_local(&mut self, other: Self) -> &mut Self {
        *self = self.cross(other);
        self
    }
}

vector_common!(Vector3, 3, (x, set_x), (y, set_y), (z, set_z));

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::MathError;

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vector3::UNIT_X.cross(Vector3::UNIT_Y), Vector3::UNIT_Z);
        assert_eq!(Vector3::UNIT_Y.cross(Vector3::UNIT_X), Vector3::NEG_UNIT_Z);
    }

    #[test]
    fn checked_component_access() {
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(v.get(2), Ok(3.0));
        assert_eq!(
            v.get(3),
            Err(MathError::IndexOutOfRange { index: 3, len: 3 })
        );
        v.set_value(0, 9.0).unwrap();
        assert_eq!(v.x(), 9.0);
        assert!(v.set_value(5, 1.0).is_err());
        assert_eq!(v, Vector3::new(9.0, 2.0, 3.0));
    }

    #[test]
    fn normalize_handles_zero() {
        assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
        let mut z = Vector3::ZERO;
        z.normalize_local();
        assert_eq!(z, Vector3::ZERO);
        let n = Vector3::new(3.0, 0.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!(n.approx_eq(&Vector3::new(0.6, 0.0, 0.8), 1e-12));
    }

    #[test]
    fn in_place_ops_chain() {
        let mut v = Vector3::ONE;
        v.add_local(Vector3::UNIT_X)
            .multiply_local(2.0)
            .subtract_local(Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(v, Vector3::new(4.0, 1.0, 2.0));
        v.scale_add_local(0.5, Vector3::ONE);
        assert_eq!(v, Vector3::new(3.0, 1.5, 2.0));
    }

    #[test]
    fn lerp_and_distance() {
        let a = Vector3::ZERO;
        let b = Vector3::new(2.0, 4.0, 6.0);
        assert_eq!(a.lerp(b, 0.5), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(b.lerp(b, 0.3), b);
        assert_eq!(a.distance_squared(b), 56.0);
    }

    #[test]
    fn finiteness_checks() {
        assert!(Vector3::ONE.is_finite());
        assert!(!Vector3::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Vector3::new(f64::NAN, 0.0, 0.0).is_infinite());
        assert!(Vector3::new(0.0, f64::INFINITY, 0.0).is_infinite());
    }

    #[test]
    fn pod_layout_is_packed() {
        let verts = [Vector3::UNIT_X, Vector3::UNIT_Y];
        let raw: &[f64] = bytemuck::cast_slice(&verts);
        assert_eq!(raw, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn capsule_defaults_missing_fields() {
        let v: Vector3 = serde_json::from_str(r#"{"y": 2.0}"#).unwrap();
        assert_eq!(v, Vector3::new(0.0, 2.0, 0.0));
    }
}
