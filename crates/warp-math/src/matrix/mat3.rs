// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_index, MathError, Result};
use crate::util::{EPSILON, ZERO_TOLERANCE};
use crate::{Quaternion, Vector3};

/// Row-major 3×3 double-precision matrix.
///
/// - Element `(r, c)` is row `r`, column `c`; vectors are columns, so
///   [`apply_post`](Self::apply_post) computes `M·v`.
/// - Used both for pure rotations (orthonormal) and for general linear maps
///   inside a [`Transform`](crate::Transform).
/// - Persists as named fields `m00`..`m22`; missing entries default to the
///   identity.
///
/// # Examples
/// ```
/// use warp_math::{Matrix3, Vector3};
/// let r = Matrix3::from_angle_axis(core::f64::consts::FRAC_PI_2, Vector3::UNIT_Z);
/// let v = r.apply_post(Vector3::UNIT_X);
/// assert!(v.approx_eq(&Vector3::UNIT_Y, 1e-12));
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "Matrix3Capsule", into = "Matrix3Capsule")]
pub struct Matrix3 {
    m: [[f64; 3]; 3],
}

impl Matrix3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// The zero matrix.
    pub const ZERO: Self = Self::from_rows([[0.0; 3]; 3]);

    /// Creates a matrix from rows.
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Creates a matrix from nine values listed row by row.
    pub const fn from_row_major(v: [f64; 9]) -> Self {
        Self::from_rows([[v[0], v[1], v[2]], [v[3], v[4], v[5]], [v[6], v[7], v[8]]])
    }

    /// Creates a matrix whose columns are `c0`, `c1`, `c2`.
    pub fn from_columns(c0: Vector3, c1: Vector3, c2: Vector3) -> Self {
        Self::from_rows([
            [c0.x(), c1.x(), c2.x()],
            [c0.y(), c1.y(), c2.y()],
            [c0.z(), c1.z(), c2.z()],
        ])
    }

    /// Rotation whose columns are the given local axes.
    pub fn from_axes(x_axis: Vector3, y_axis: Vector3, z_axis: Vector3) -> Self {
        Self::from_columns(x_axis, y_axis, z_axis)
    }

    /// Diagonal matrix `diag(v)`.
    pub fn from_diagonal(v: Vector3) -> Self {
        Self::from_rows([[v.x(), 0.0, 0.0], [0.0, v.y(), 0.0], [0.0, 0.0, v.z()]])
    }

    /// Rotation of `angle` radians about `axis` (normalized here).
    ///
    /// A zero axis yields a rotation about the zero vector, i.e. a uniform
    /// `cos(angle)` scale; callers should pass a non-degenerate axis.
    pub fn from_angle_axis(angle: f64, axis: Vector3) -> Self {
        Self::from_angle_normal_axis(angle, axis.normalize())
    }

    /// Rotation of `angle` radians about an already-normalized `axis`.
    pub fn from_angle_normal_axis(angle: f64, axis: Vector3) -> Self {
        let (sin, cos) = angle.sin_cos();
        let one_minus_cos = 1.0 - cos;
        let (x, y, z) = (axis.x(), axis.y(), axis.z());
        let xym = x * y * one_minus_cos;
        let xzm = x * z * one_minus_cos;
        let yzm = y * z * one_minus_cos;
        let (xs, ys, zs) = (x * sin, y * sin, z * sin);
        Self::from_rows([
            [x * x * one_minus_cos + cos, xym - zs, xzm + ys],
            [xym + zs, y * y * one_minus_cos + cos, yzm - xs],
            [xzm - ys, yzm + xs, z * z * one_minus_cos + cos],
        ])
    }

    /// Euler rotation `R_y(yaw) · R_z(roll) · R_x(pitch)`, angles in radians.
    pub fn from_angles(yaw: f64, roll: f64, pitch: f64) -> Self {
        let (sy, cy) = yaw.sin_cos();
        let (sr, cr) = roll.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        Self::from_rows([
            [cy * cr, sy * sp - cy * sr * cp, cy * sr * sp + sy * cp],
            [sr, cr * cp, -cr * sp],
            [-sy * cr, sy * sr * cp + cy * sp, -sy * sr * sp + cy * cp],
        ])
    }

    /// Rotation matrix equivalent to `q`.
    pub fn from_quaternion(q: &Quaternion) -> Self {
        q.to_rotation_matrix()
    }

    /// Rotation pointing local +Z along `direction` with +Y near `world_up`.
    pub fn look_at(direction: Vector3, world_up: Vector3) -> Self {
        let z_axis = direction.normalize();
        let x_axis = world_up.normalize().cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis);
        Self::from_axes(x_axis, y_axis, z_axis)
    }

    /// Resets to the identity.
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Element at `(row, column)`.
    pub fn value(&self, row: usize, column: usize) -> Result<f64> {
        check_index(row, 3)?;
        check_index(column, 3)?;
        Ok(self.m[row][column])
    }

    /// Overwrites the element at `(row, column)`.
    pub fn set_value(&mut self, row: usize, column: usize, value: f64) -> Result<&mut Self> {
        check_index(row, 3)?;
        check_index(column, 3)?;
        self.m[row][column] = value;
        Ok(self)
    }

    /// Row `index` as a vector.
    pub fn row(&self, index: usize) -> Result<Vector3> {
        check_index(index, 3)?;
        Ok(Vector3::from(self.m[index]))
    }

    /// Column `index` as a vector.
    pub fn column(&self, index: usize) -> Result<Vector3> {
        check_index(index, 3)?;
        Ok(Vector3::new(self.m[0][index], self.m[1][index], self.m[2][index]))
    }

    /// Overwrites row `index`.
    pub fn set_row(&mut self, index: usize, row: Vector3) -> Result<&mut Self> {
        check_index(index, 3)?;
        self.m[index] = row.to_array();
        Ok(self)
    }

    /// Overwrites column `index`.
    pub fn set_column(&mut self, index: usize, column: Vector3) -> Result<&mut Self> {
        check_index(index, 3)?;
        for (r, value) in column.to_array().into_iter().enumerate() {
            self.m[r][index] = value;
        }
        Ok(self)
    }

    /// Rows as nested arrays.
    pub const fn to_rows(self) -> [[f64; 3]; 3] {
        self.m
    }

    /// Elements row by row.
    pub fn to_array(self) -> [f64; 9] {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.m;
        [a, b, c, d, e, f, g, h, i]
    }

    /// Matrix product `self · rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (r, out_row) in out.iter_mut().enumerate() {
            for (c, cell) in out_row.iter_mut().enumerate() {
                *cell = self.m[r][0] * rhs.m[0][c]
                    + self.m[r][1] * rhs.m[1][c]
                    + self.m[r][2] * rhs.m[2][c];
            }
        }
        Self::from_rows(out)
    }

    /// Replaces `self` with `self · rhs`.
    pub fn multiply_local(&mut self, rhs: &Self) -> &mut Self {
        *self = self.multiply(rhs);
        self
    }

    /// Every element multiplied by `scalar`.
    pub fn multiply_scalar(&self, scalar: f64) -> Self {
        Self::from_rows(self.m.map(|row| row.map(|v| v * scalar)))
    }

    /// Multiplies every element by `scalar` in place.
    pub fn multiply_scalar_local(&mut self, scalar: f64) -> &mut Self {
        *self = self.multiply_scalar(scalar);
        self
    }

    /// `diag(v) · self`: row `i` scaled by `v[i]`.
    pub fn multiply_diagonal_pre(&self, v: Vector3) -> Self {
        let s = v.to_array();
        let mut out = self.m;
        for (row, factor) in out.iter_mut().zip(s) {
            *row = row.map(|x| x * factor);
        }
        Self::from_rows(out)
    }

    /// `self · diag(v)`: column `j` scaled by `v[j]`.
    pub fn multiply_diagonal_post(&self, v: Vector3) -> Self {
        let s = v.to_array();
        Self::from_rows(self.m.map(|row| [row[0] * s[0], row[1] * s[1], row[2] * s[2]]))
    }

    /// Scales each column by the matching component of `scale`.
    ///
    /// Equivalent to [`multiply_diagonal_post`](Self::multiply_diagonal_post).
    pub fn scale(&self, scale: Vector3) -> Self {
        self.multiply_diagonal_post(scale)
    }

    /// Scales each column in place.
    pub fn scale_local(&mut self, scale: Vector3) -> &mut Self {
        *self = self.scale(scale);
        self
    }

    /// Adds `rhs` element-wise in place.
    pub fn add_local(&mut self, rhs: &Self) -> &mut Self {
        *self = *self + *rhs;
        self
    }

    /// Subtracts `rhs` element-wise in place.
    pub fn subtract_local(&mut self, rhs: &Self) -> &mut Self {
        *self = *self - *rhs;
        self
    }

    /// Post-multiplies by a rotation of `angle` radians about +X.
    pub fn apply_rotation_x(&mut self, angle: f64) -> &mut Self {
        let (sin, cos) = angle.sin_cos();
        for row in &mut self.m {
            let (m1, m2) = (row[1], row[2]);
            row[1] = m1 * cos + m2 * sin;
            row[2] = m2 * cos - m1 * sin;
        }
        self
    }

    /// Post-multiplies by a rotation of `angle` radians about +Y.
    pub fn apply_rotation_y(&mut self, angle: f64) -> &mut Self {
        let (sin, cos) = angle.sin_cos();
        for row in &mut self.m {
            let (m0, m2) = (row[0], row[2]);
            row[0] = m0 * cos - m2 * sin;
            row[2] = m0 * sin + m2 * cos;
        }
        self
    }

    /// Post-multiplies by a rotation of `angle` radians about +Z.
    pub fn apply_rotation_z(&mut self, angle: f64) -> &mut Self {
        let (sin, cos) = angle.sin_cos();
        for row in &mut self.m {
            let (m0, m1) = (row[0], row[1]);
            row[0] = m0 * cos + m1 * sin;
            row[1] = m1 * cos - m0 * sin;
        }
        self
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::from_rows([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// Transposes in place.
    pub fn transpose_local(&mut self) -> &mut Self {
        *self = self.transpose();
        self
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Classical adjoint (transposed cofactor matrix).
    pub fn adjugate(&self) -> Self {
        let m = &self.m;
        Self::from_rows([
            [
                m[1][1] * m[2][2] - m[1][2] * m[2][1],
                m[0][2] * m[2][1] - m[0][1] * m[2][2],
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
            ],
            [
                m[1][2] * m[2][0] - m[1][0] * m[2][2],
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                m[0][2] * m[1][0] - m[0][0] * m[1][2],
            ],
            [
                m[1][0] * m[2][1] - m[1][1] * m[2][0],
                m[0][1] * m[2][0] - m[0][0] * m[2][1],
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
            ],
        ])
    }

    /// Replaces `self` with its adjugate.
    pub fn adjugate_local(&mut self) -> &mut Self {
        *self = self.adjugate();
        self
    }

    /// Inverse matrix.
    ///
    /// # Errors
    /// [`MathError::SingularMatrix`] when `|det| <= EPSILON`.
    pub fn invert(&self) -> Result<Self> {
        let det = self.determinant();
        if det.abs() <= EPSILON {
            debug!(determinant = det, "refusing to invert singular 3x3 matrix");
            return Err(MathError::SingularMatrix { determinant: det });
        }
        Ok(self.adjugate().multiply_scalar(1.0 / det))
    }

    /// Inverts in place; `self` is untouched on error.
    ///
    /// # Errors
    /// See [`invert`](Self::invert).
    pub fn invert_local(&mut self) -> Result<&mut Self> {
        *self = self.invert()?;
        Ok(self)
    }

    /// Row-vector product `vᵀ · M`.
    pub fn apply_pre(&self, v: Vector3) -> Vector3 {
        let m = &self.m;
        let (x, y, z) = (v.x(), v.y(), v.z());
        Vector3::new(
            m[0][0] * x + m[1][0] * y + m[2][0] * z,
            m[0][1] * x + m[1][1] * y + m[2][1] * z,
            m[0][2] * x + m[1][2] * y + m[2][2] * z,
        )
    }

    /// Column-vector product `M · v`.
    pub fn apply_post(&self, v: Vector3) -> Vector3 {
        let m = &self.m;
        let (x, y, z) = (v.x(), v.y(), v.z());
        Vector3::new(
            m[0][0] * x + m[0][1] * y + m[0][2] * z,
            m[1][0] * x + m[1][1] * y + m[1][2] * z,
            m[2][0] * x + m[2][1] * y + m[2][2] * z,
        )
    }

    /// Exact comparison against [`IDENTITY`](Self::IDENTITY).
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// `true` when the rows are unit length and mutually perpendicular,
    /// each product within [`ZERO_TOLERANCE`].
    pub fn is_orthonormal(&self) -> bool {
        let rows = self.m.map(Vector3::from);
        for (i, a) in rows.iter().enumerate() {
            for (j, b) in rows.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                if (a.dot(*b) - expected).abs() > ZERO_TOLERANCE {
                    return false;
                }
            }
        }
        true
    }

    /// `true` when no element is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// Element-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[[f64; 3]; 3]> for Matrix3 {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_rows(rows)
    }
}

impl Mul for Matrix3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.apply_post(rhs)
    }
}

impl Mul<f64> for Matrix3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.multiply_scalar(rhs)
    }
}

impl MulAssign for Matrix3 {
    fn mul_assign(&mut self, rhs: Self) {
        self.multiply_local(&rhs);
    }
}

impl Add for Matrix3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let mut out = self.m;
        for (row, rhs_row) in out.iter_mut().zip(rhs.m) {
            for (v, r) in row.iter_mut().zip(rhs_row) {
                *v += r;
            }
        }
        Self::from_rows(out)
    }
}

impl Sub for Matrix3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + rhs * -1.0
    }
}

impl AddAssign for Matrix3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Matrix3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

crate::impl_poolable!(Matrix3, new = Matrix3::IDENTITY, recycle_to = Matrix3::IDENTITY);

/// Named-field persisted form; omitted entries fall back to the identity.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct Matrix3Capsule {
    m00: f64,
    m01: f64,
    m02: f64,
    m10: f64,
    m11: f64,
    m12: f64,
    m20: f64,
    m21: f64,
    m22: f64,
}

impl Default for Matrix3Capsule {
    fn default() -> Self {
        Self::from(Matrix3::IDENTITY)
    }
}

impl From<Matrix3> for Matrix3Capsule {
    fn from(value: Matrix3) -> Self {
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = value.m;
        Self {
            m00,
            m01,
            m02,
            m10,
            m11,
            m12,
            m20,
            m21,
            m22,
        }
    }
}

impl From<Matrix3Capsule> for Matrix3 {
    fn from(c: Matrix3Capsule) -> Self {
        Self::from_rows([
            [c.m00, c.m01, c.m02],
            [c.m10, c.m11, c.m12],
            [c.m20, c.m21, c.m22],
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-12;

    fn sample() -> Matrix3 {
        Matrix3::from_rows([[2.0, 0.0, 1.0], [1.0, 3.0, 0.0], [0.0, 1.0, 4.0]])
    }

    #[test]
    fn inverse_times_self_is_identity() {
        let m = sample();
        let inv = m.invert().unwrap();
        assert!(m.multiply(&inv).approx_eq(&Matrix3::IDENTITY, EPS));
        assert!(inv.multiply(&m).approx_eq(&Matrix3::IDENTITY, EPS));
    }

    #[test]
    fn singular_inverse_fails_and_leaves_receiver() {
        let mut m = Matrix3::from_rows([[1.0, 2.0, 3.0], [1.0, 2.0, 3.0], [0.0, 1.0, 0.0]]);
        let before = m;
        assert!(matches!(
            m.invert_local(),
            Err(MathError::SingularMatrix { .. })
        ));
        assert_eq!(m, before);
    }

    #[test]
    fn adjugate_relates_to_determinant() {
        let m = sample();
        let product = m.multiply(&m.adjugate());
        let det = m.determinant();
        assert!(product.approx_eq(&Matrix3::IDENTITY.multiply_scalar(det), EPS));
    }

    #[test]
    fn axis_rotations_match_angle_axis() {
        let angle = 0.7;
        let rotated = |f: fn(&mut Matrix3, f64) -> &mut Matrix3| {
            let mut m = Matrix3::IDENTITY;
            f(&mut m, angle);
            m
        };
        for (axis, mut m) in [
            (Vector3::UNIT_X, rotated(Matrix3::apply_rotation_x)),
            (Vector3::UNIT_Y, rotated(Matrix3::apply_rotation_y)),
            (Vector3::UNIT_Z, rotated(Matrix3::apply_rotation_z)),
        ] {
            assert!(m.approx_eq(&Matrix3::from_angle_axis(angle, axis), EPS));
            assert!(m.is_orthonormal());
            m.scale_local(Vector3::new(2.0, 1.0, 1.0));
            assert!(!m.is_orthonormal());
        }
    }

    #[test]
    fn from_angles_composes_yaw_roll_pitch() {
        let (yaw, roll, pitch) = (0.3, -0.2, 1.1);
        let expected = Matrix3::from_angle_axis(yaw, Vector3::UNIT_Y)
            * Matrix3::from_angle_axis(roll, Vector3::UNIT_Z)
            * Matrix3::from_angle_axis(pitch, Vector3::UNIT_X);
        assert!(Matrix3::from_angles(yaw, roll, pitch).approx_eq(&expected, EPS));
    }

    #[test]
    fn pre_and_post_application() {
        let m = sample();
        let v = Vector3::new(1.0, -1.0, 2.0);
        assert_eq!(m.apply_post(v), Vector3::new(4.0, -2.0, 7.0));
        assert_eq!(m.apply_pre(v), m.transpose().apply_post(v));
    }

    #[test]
    fn diagonal_products_scale_rows_or_columns() {
        let s = Vector3::new(2.0, 3.0, 4.0);
        let m = sample();
        assert_eq!(
            m.multiply_diagonal_pre(s),
            Matrix3::from_diagonal(s).multiply(&m)
        );
        assert_eq!(
            m.multiply_diagonal_post(s),
            m.multiply(&Matrix3::from_diagonal(s))
        );
    }

    #[test]
    fn row_and_column_access_is_checked() {
        let mut m = Matrix3::IDENTITY;
        m.set_column(1, Vector3::new(4.0, 5.0, 6.0)).unwrap();
        assert_eq!(m.row(0).unwrap(), Vector3::new(1.0, 4.0, 0.0));
        assert_eq!(m.value(2, 1), Ok(6.0));
        assert_eq!(
            m.value(3, 0),
            Err(MathError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(m.set_row(7, Vector3::ZERO).is_err());
    }

    #[test]
    fn look_at_points_z_along_direction() {
        let m = Matrix3::look_at(Vector3::new(0.0, 0.0, -5.0), Vector3::UNIT_Y);
        assert!(m.is_orthonormal());
        let z = m.column(2).unwrap();
        assert!(z.approx_eq(&Vector3::NEG_UNIT_Z, EPS));
        let r = Matrix3::from_angle_axis(FRAC_PI_2, Vector3::UNIT_Y);
        assert!(r.is_orthonormal());
    }

    #[test]
    fn capsule_defaults_to_identity() {
        let m: Matrix3 = serde_json::from_str(r#"{"m01": 2.5}"#).unwrap();
        let mut expected = Matrix3::IDENTITY;
        expected.set_value(0, 1, 2.5).unwrap();
        assert_eq!(m, expected);
        let text = serde_json::to_string(&sample()).unwrap();
        assert_eq!(serde_json::from_str::<Matrix3>(&text).unwrap(), sample());
    }
}
