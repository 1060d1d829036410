// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Two-component double-precision vector (texture coordinates, screen space).
#[repr(C)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Vector2 {
    x: f64,
    y: f64,
}

impl Vector2 {
    /// `(0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0);
    /// `(1, 1)`.
    pub const ONE: Self = Self::new(1.0, 1.0);
    /// `(-1, -1)`.
    pub const NEG_ONE: Self = Self::new(-1.0, -1.0);
    /// Unit vector along +X.
    pub const UNIT_X: Self = Self::new(1.0, 0.0);
    /// Unit vector along -X.
    pub const NEG_UNIT_X: Self = Self::new(-1.0, 0.0);
    /// Unit vector along +Y.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0);
    /// Unit vector along -Y.
    pub const NEG_UNIT_Y: Self = Self::new(0.0, -1.0);

    /// Overwrites both components.
    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        *self = Self::new(x, y);
        self
    }

    /// Rotates about the origin by `angle` radians, counter-clockwise unless
    /// `clockwise` is set.
    pub fn rotate_around_origin(self, angle: f64, clockwise: bool) -> Self {
        let angle = if clockwise { -angle } else { angle };
        let (sin, cos) = angle.sin_cos();
        Self::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y)
    }

    /// Rotates about the origin in place.
    pub fn rotate_around_origin_local(&mut self, angle: f64, clockwise: bool) -> &mut Self {
        *self = self.rotate_around_origin(angle, clockwise);
        self
    }

    /// Signed angle that rotates `self` onto `other`.
    pub fn angle_between(self, other: Self) -> f64 {
        other.y.atan2(other.x) - self.y.atan2(self.x)
    }

    /// Polar angle measured clockwise from +X.
    pub fn polar_angle(self) -> f64 {
        -self.y.atan2(self.x)
    }
}

vector_common!(Vector2, 2, (x, set_x), (y, set_y));
