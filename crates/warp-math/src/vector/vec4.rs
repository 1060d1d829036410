// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::Vector3;

/// Four-component double-precision vector, typically homogeneous
/// coordinates for [`Matrix4`](crate::Matrix4) products.
#[repr(C)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Vector4 {
    x: f64,
    y: f64,
    z: f64,
    w: f64,
}

impl Vector4 {
    /// `(0, 0, 0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// `(1, 1, 1, 1)`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// `(-1, -1, -1, -1)`.
    pub const NEG_ONE: Self = Self::new(-1.0, -1.0, -1.0, -1.0);
    /// Unit vector along +X.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    /// Unit vector along +Y.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    /// Unit vector along +Z.
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    /// Unit vector along +W.
    pub const UNIT_W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Extends a 3-vector with the given `w` (1 for points, 0 for directions).
    pub const fn from_vector3(v: Vector3, w: f64) -> Self {
        Self::new(v.x(), v.y(), v.z(), w)
    }

    /// Drops the `w` component.
    pub const fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Overwrites all four components.
    pub fn set(&mut self, x: f64, y: f64, z: f64, w: f64) -> &mut Self {
        *self = Self::new(x, y, z, w);
        self
    }
}

vector_common!(Vector4, 4, (x, set_x), (y, set_y), (z, set_z), (w, set_w));

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn homogeneous_round_trip() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        let h = Vector4::from_vector3(p, 1.0);
        assert_eq!(h.w(), 1.0);
        assert_eq!(h.xyz(), p);
    }

    #[test]
    fn dot_covers_all_components() {
        assert_eq!(Vector4::ONE.dot(Vector4::new(1.0, 2.0, 3.0, 4.0)), 10.0);
        assert_eq!(Vector4::UNIT_W.length(), 1.0);
    }
}
