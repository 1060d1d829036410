// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::{Add, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::util::{acos_clamped, EPSILON, HALF_PI};
use crate::{Matrix3, Matrix4, Vector3};

/// Quaternion `(x, y, z, w)` used to represent rotations.
///
/// * Rotation helpers assume unit length; [`normalize`](Self::normalize)
///   before use when the value comes from accumulated arithmetic.
/// * Hamilton product order: `a * b` applies `b` first, then `a`.
/// * Persists as `{ "x", "y", "z", "w" }`; omitted fields take the identity
///   values (`w` defaults to 1).
///
/// # Examples
/// ```
/// use warp_math::{Quaternion, Vector3};
/// let q = Quaternion::from_angle_axis(core::f64::consts::FRAC_PI_2, Vector3::UNIT_Y);
/// let v = q.apply(Vector3::UNIT_Z);
/// assert!(v.approx_eq(&Vector3::UNIT_X, 1e-12));
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(default)]
pub struct Quaternion {
    x: f64,
    y: f64,
    z: f64,
    w: f64,
}

impl Quaternion {
    /// Identity rotation `(0, 0, 0, 1)`.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// X component.
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Y component.
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Z component.
    pub const fn z(&self) -> f64 {
        self.z
    }

    /// W (scalar) component.
    pub const fn w(&self) -> f64 {
        self.w
    }

    /// Overwrites all components.
    pub fn set(&mut self, x: f64, y: f64, z: f64, w: f64) -> &mut Self {
        *self = Self::new(x, y, z, w);
        self
    }

    /// Resets to the identity rotation.
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Components as `[x, y, z, w]`.
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Builds a rotation from Euler angles in radians.
    ///
    /// `heading` turns about +Y, `attitude` about +Z and `bank` about +X,
    /// applied in that order.
    pub fn from_euler_angles(heading: f64, attitude: f64, bank: f64) -> Self {
        let (sh, ch) = (heading * 0.5).sin_cos();
        let (sa, ca) = (attitude * 0.5).sin_cos();
        let (sb, cb) = (bank * 0.5).sin_cos();

        let chca = ch * ca;
        let shsa = sh * sa;
        let chsa = ch * sa;
        let shca = sh * ca;

        Self::new(
            chca * sb + shsa * cb,
            shca * cb + chsa * sb,
            chsa * cb - shca * sb,
            chca * cb - shsa * sb,
        )
        .normalize()
    }

    /// Euler angles `[heading, attitude, bank]` in radians.
    ///
    /// Near the poles (`|attitude| ≈ π/2`) bank is reported as zero and the
    /// whole twist is folded into heading.
    pub fn to_euler_angles(&self) -> [f64; 3] {
        let sqw = self.w * self.w;
        let sqx = self.x * self.x;
        let sqy = self.y * self.y;
        let sqz = self.z * self.z;
        // 1 when normalized, otherwise a correction factor.
        let unit = sqx + sqy + sqz + sqw;
        let test = self.x * self.y + self.z * self.w;
        if test > 0.499 * unit {
            [2.0 * self.x.atan2(self.w), HALF_PI, 0.0]
        } else if test < -0.499 * unit {
            [-2.0 * self.x.atan2(self.w), -HALF_PI, 0.0]
        } else {
            [
                (2.0 * self.y * self.w - 2.0 * self.x * self.z).atan2(sqx - sqy - sqz + sqw),
                (2.0 * test / unit).asin(),
                (2.0 * self.x * self.w - 2.0 * self.y * self.z).atan2(-sqx + sqy - sqz + sqw),
            ]
        }
    }

    /// Converts an orthonormal rotation matrix (Shoemake's trace method).
    pub fn from_rotation_matrix(matrix: &Matrix3) -> Self {
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = matrix.to_rows();
        let trace = m00 + m11 + m22;
        if trace >= 0.0 {
            let s = (trace + 1.0).sqrt();
            let w = 0.5 * s;
            let s = 0.5 / s;
            Self::new((m21 - m12) * s, (m02 - m20) * s, (m10 - m01) * s, w)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt();
            let x = 0.5 * s;
            let s = 0.5 / s;
            Self::new(x, (m10 + m01) * s, (m02 + m20) * s, (m21 - m12) * s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt();
            let y = 0.5 * s;
            let s = 0.5 / s;
            Self::new((m10 + m01) * s, y, (m21 + m12) * s, (m02 - m20) * s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt();
            let z = 0.5 * s;
            let s = 0.5 / s;
            Self::new((m02 + m20) * s, (m21 + m12) * s, z, (m10 - m01) * s)
        }
    }

    /// Products shared by the matrix conversions, pre-scaled by `2 / norm`.
    ///
    /// A zero quaternion yields `s = 0` and therefore the identity.
    fn scaled_products(&self) -> [f64; 9] {
        let norm = self.magnitude_squared();
        let s = if norm > 0.0 { 2.0 / norm } else { 0.0 };
        let xs = self.x * s;
        let ys = self.y * s;
        let zs = self.z * s;
        [
            self.x * xs, // xx
            self.x * ys, // xy
            self.x * zs, // xz
            self.w * xs, // xw
            self.y * ys, // yy
            self.y * zs, // yz
            self.w * ys, // yw
            self.z * zs, // zz
            self.w * zs, // zw
        ]
    }

    /// Equivalent 3×3 rotation matrix.
    pub fn to_rotation_matrix(&self) -> Matrix3 {
        let [xx, xy, xz, xw, yy, yz, yw, zz, zw] = self.scaled_products();
        Matrix3::from_rows([
            [1.0 - (yy + zz), xy - zw, xz + yw],
            [xy + zw, 1.0 - (xx + zz), yz - xw],
            [xz - yw, yz + xw, 1.0 - (xx + yy)],
        ])
    }

    /// Equivalent 4×4 rotation matrix (no translation).
    pub fn to_rotation_matrix4(&self) -> Matrix4 {
        Matrix4::from_matrix3(&self.to_rotation_matrix())
    }

    /// Column `index` of the equivalent rotation matrix.
    pub fn rotation_column(&self, index: usize) -> Result<Vector3> {
        let [xx, xy, xz, xw, yy, yz, yw, zz, zw] = self.scaled_products();
        match index {
            0 => Ok(Vector3::new(1.0 - (yy + zz), xy + zw, xz - yw)),
            1 => Ok(Vector3::new(xy - zw, 1.0 - (xx + zz), yz + xw)),
            2 => Ok(Vector3::new(xz + yw, yz - xw, 1.0 - (xx + yy))),
            _ => Err(MathError::IndexOutOfRange { index, len: 3 }),
        }
    }

    /// Rotation of `angle` radians about `axis` (normalized here).
    ///
    /// A zero axis yields the identity.
    pub fn from_angle_axis(angle: f64, axis: Vector3) -> Self {
        Self::from_angle_normal_axis(angle, axis.normalize())
    }

    /// Rotation of `angle` radians about an already-normalized `axis`.
    pub fn from_angle_normal_axis(angle: f64, axis: Vector3) -> Self {
        if axis == Vector3::ZERO {
            return Self::IDENTITY;
        }
        let (sin, cos) = (0.5 * angle).sin_cos();
        Self::new(sin * axis.x(), sin * axis.y(), sin * axis.z(), cos)
    }

    /// Decomposes into `(angle, unit axis)`; near-identity values report
    /// `(0, +X)`.
    pub fn to_angle_axis(&self) -> (f64, Vector3) {
        let len_sq = self.x * self.x + self.y * self.y + self.z * self.z;
        if len_sq.abs() <= EPSILON {
            (0.0, Vector3::UNIT_X)
        } else {
            let inv = 1.0 / len_sq.sqrt();
            (
                2.0 * acos_clamped(self.w),
                Vector3::new(self.x * inv, self.y * inv, self.z * inv),
            )
        }
    }

    /// Shortest rotation carrying direction `from` onto direction `to`.
    ///
    /// Opposite vectors rotate half a turn about an axis perpendicular to
    /// `from`; zero-length inputs yield the identity.
    pub fn from_vector_to_vector(from: Vector3, to: Vector3) -> Self {
        let factor = from.length() * to.length();
        if factor.abs() <= EPSILON {
            return Self::IDENTITY;
        }
        let dot = from.dot(to) / factor;
        let theta = acos_clamped(dot);
        let mut pivot = from.cross(to);
        if dot < 0.0 && pivot.length() < EPSILON {
            // Any perpendicular axis works; build one from the dominant component.
            let a = from.to_array();
            let dominant = if a[0].abs() > a[1].abs() {
                if a[0].abs() > a[2].abs() {
                    0
                } else {
                    2
                }
            } else if a[1].abs() > a[2].abs() {
                1
            } else {
                2
            };
            let mut p = [0.0; 3];
            p[dominant] = -a[(dominant + 1) % 3];
            p[(dominant + 1) % 3] = a[dominant];
            pivot = Vector3::from(p);
        }
        Self::from_angle_axis(theta, pivot)
    }

    /// Rotation whose local axes are `x_axis`, `y_axis`, `z_axis`.
    pub fn from_axes(x_axis: Vector3, y_axis: Vector3, z_axis: Vector3) -> Self {
        Self::from_rotation_matrix(&Matrix3::from_axes(x_axis, y_axis, z_axis))
    }

    /// Local axes `[x, y, z]` of this rotation.
    pub fn to_axes(&self) -> [Vector3; 3] {
        // Columns of the rotation are the rows of its transpose.
        self.to_rotation_matrix().transpose().to_rows().map(Vector3::from)
    }

    /// Rotation pointing local +Z along `direction` with +Y near `up`.
    pub fn look_at(direction: Vector3, up: Vector3) -> Self {
        let z_axis = direction.normalize();
        let x_axis = up.normalize().cross(z_axis);
        let y_axis = z_axis.cross(x_axis);
        Self::from_axes(x_axis, y_axis, z_axis).normalize()
    }

    /// Squared norm.
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Norm.
    pub fn magnitude(&self) -> f64 {
        let sq = self.magnitude_squared();
        if sq == 1.0 {
            1.0
        } else {
            sq.sqrt()
        }
    }

    /// Four-component dot product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Unit-length copy; the zero quaternion is returned unchanged.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            *self
        } else {
            *self * (1.0 / mag)
        }
    }

    /// Normalizes in place.
    pub fn normalize_local(&mut self) -> &mut Self {
        *self = self.normalize();
        self
    }

    /// Conjugate `(-x, -y, -z, w)`.
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Conjugates in place.
    pub fn conjugate_local(&mut self) -> &mut Self {
        *self = self.conjugate();
        self
    }

    /// Multiplicative inverse; unit quaternions skip the division.
    pub fn invert(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        let conj = self.conjugate();
        if (1.0 - mag_sq).abs() <= EPSILON {
            conj
        } else {
            conj * (1.0 / mag_sq)
        }
    }

    /// Inverts in place.
    pub fn invert_local(&mut self) -> &mut Self {
        *self = self.invert();
        self
    }

    /// Hamilton product `self * rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        Self::new(
            x * rhs.w + y * rhs.z - z * rhs.y + w * rhs.x,
            -x * rhs.z + y * rhs.w + z * rhs.x + w * rhs.y,
            x * rhs.y - y * rhs.x + z * rhs.w + w * rhs.z,
            -x * rhs.x - y * rhs.y - z * rhs.z + w * rhs.w,
        )
    }

    /// Replaces `self` with `self * rhs`.
    pub fn multiply_local(&mut self, rhs: &Self) -> &mut Self {
        *self = self.multiply(rhs);
        self
    }

    /// Post-multiplies by a rotation of `angle` about `(x, y, z)`.
    ///
    /// A zero axis leaves the quaternion unchanged.
    pub fn apply_rotation(&mut self, angle: f64, x: f64, y: f64, z: f64) -> &mut Self {
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return self;
        }
        let (sin, cos) = (0.5 * angle).sin_cos();
        self.multiply_local(&Self::new(sin * x, sin * y, sin * z, cos))
    }

    /// Post-multiplies by a rotation of `angle` about +X.
    pub fn apply_rotation_x(&mut self, angle: f64) -> &mut Self {
        let (sin, cos) = (0.5 * angle).sin_cos();
        let Self { x, y, z, w } = *self;
        self.set(x * cos + w * sin, y * cos + z * sin, -y * sin + z * cos, -x * sin + w * cos)
    }

    /// Post-multiplies by a rotation of `angle` about +Y.
    pub fn apply_rotation_y(&mut self, angle: f64) -> &mut Self {
        let (sin, cos) = (0.5 * angle).sin_cos();
        let Self { x, y, z, w } = *self;
        self.set(x * cos - z * sin, y * cos + w * sin, x * sin + z * cos, -y * sin + w * cos)
    }

    /// Post-multiplies by a rotation of `angle` about +Z.
    pub fn apply_rotation_z(&mut self, angle: f64) -> &mut Self {
        let (sin, cos) = (0.5 * angle).sin_cos();
        let Self { x, y, z, w } = *self;
        self.set(x * cos + y * sin, -x * sin + y * cos, z * cos + w * sin, -z * sin + w * cos)
    }

    /// Rotates `v` by this (unit) quaternion.
    pub fn apply(&self, v: Vector3) -> Vector3 {
        if v == Vector3::ZERO {
            return Vector3::ZERO;
        }
        let u = Vector3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Spherical interpolation from `self` (`t = 0`) to `end` (`t = 1`).
    ///
    /// Takes the shorter arc and falls back to linear weights when the
    /// quaternions are close (`1 - dot <= 0.1`).
    pub fn slerp(&self, end: &Self, t: f64) -> Self {
        if t == 0.0 {
            return *self;
        }
        if t == 1.0 || self == end {
            return *end;
        }

        let mut end = *end;
        let mut dot = self.dot(&end);
        if dot < 0.0 {
            end = -end;
            dot = -dot;
        }

        let (mut scale0, mut scale1) = (1.0 - t, t);
        if 1.0 - dot > 0.1 {
            let theta = acos_clamped(dot);
            let inv_sin_theta = 1.0 / theta.sin();
            scale0 = ((1.0 - t) * theta).sin() * inv_sin_theta;
            scale1 = (t * theta).sin() * inv_sin_theta;
        }
        *self * scale0 + end * scale1
    }

    /// Interpolates toward `end` in place.
    pub fn slerp_local(&mut self, end: &Self, t: f64) -> &mut Self {
        *self = self.slerp(end, t);
        self
    }

    /// Exact comparison against [`IDENTITY`](Self::IDENTITY).
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// `true` when no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Mul<Vector3> for Quaternion {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.apply(rhs)
    }
}

impl Add for Quaternion {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Quaternion {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Neg for Quaternion {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

crate::impl_poolable!(Quaternion, new = Quaternion::IDENTITY, recycle_to = Quaternion::IDENTITY);
