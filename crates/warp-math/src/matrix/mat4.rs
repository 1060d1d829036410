// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::{Add, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_index, MathError, Result};
use crate::util::{EPSILON, ZERO_TOLERANCE};
use crate::{Matrix3, Quaternion, Vector3, Vector4};

/// Row-major 4×4 double-precision matrix for homogeneous transforms.
///
/// - Points transform as `M·(x, y, z, 1)`; translation lives in column 3.
/// - Flat marshaling always names its element order explicitly
///   (`row_major: bool`); graphics APIs usually want column-major, see
///   [`column_major_f32`](Self::column_major_f32).
/// - Persists as named fields `m00`..`m33`; missing entries default to the
///   identity.
///
/// # Examples
/// ```
/// use warp_math::{Matrix4, Vector3};
/// let mut m = Matrix4::IDENTITY;
/// m.apply_translation_post(1.0, 2.0, 3.0);
/// assert_eq!(m.apply_post_point(Vector3::ZERO), Vector3::new(1.0, 2.0, 3.0));
/// assert_eq!(m.apply_post_vector(Vector3::UNIT_X), Vector3::UNIT_X);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "Matrix4Capsule", into = "Matrix4Capsule")]
pub struct Matrix4 {
    m: [[f64; 4]; 4],
}

/// Number of elements in a flat 4×4 buffer.
const LEN: usize = 16;

impl Matrix4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Creates a matrix from rows.
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { m: rows }
    }

    /// Reads 16 values from `source` in the given element order.
    ///
    /// Extra trailing values are ignored.
    ///
    /// # Errors
    /// [`MathError::InvalidArgument`] when `source` holds fewer than 16 values.
    pub fn from_slice(source: &[f64], row_major: bool) -> Result<Self> {
        let values: &[f64; LEN] = source
            .get(..LEN)
            .and_then(|s| s.try_into().ok())
            .ok_or(MathError::InvalidArgument("matrix source needs 16 values"))?;
        Ok(Self::from_flat(*values, row_major))
    }

    /// Like [`from_slice`](Self::from_slice) for single-precision buffers.
    ///
    /// # Errors
    /// [`MathError::InvalidArgument`] when `source` holds fewer than 16 values.
    pub fn from_slice_f32(source: &[f32], row_major: bool) -> Result<Self> {
        let values: &[f32; LEN] = source
            .get(..LEN)
            .and_then(|s| s.try_into().ok())
            .ok_or(MathError::InvalidArgument("matrix source needs 16 values"))?;
        Ok(Self::from_flat(values.map(f64::from), row_major))
    }

    fn from_flat(v: [f64; LEN], row_major: bool) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, value) in v.into_iter().enumerate() {
            let (major, minor) = (i / 4, i % 4);
            if row_major {
                m[major][minor] = value;
            } else {
                m[minor][major] = value;
            }
        }
        Self::from_rows(m)
    }

    /// All 16 elements in the requested order.
    pub fn to_array(&self, row_major: bool) -> [f64; LEN] {
        let mut out = [0.0; LEN];
        for (i, slot) in out.iter_mut().enumerate() {
            let (major, minor) = (i / 4, i % 4);
            *slot = if row_major {
                self.m[major][minor]
            } else {
                self.m[minor][major]
            };
        }
        out
    }

    /// Writes all 16 elements into the front of `store`.
    ///
    /// # Errors
    /// [`MathError::InvalidArgument`] when `store` has room for fewer than 16
    /// values; nothing is written in that case.
    pub fn write_to_slice(&self, store: &mut [f64], row_major: bool) -> Result<()> {
        let dst = store
            .get_mut(..LEN)
            .ok_or(MathError::InvalidArgument("matrix store needs room for 16 values"))?;
        dst.copy_from_slice(&self.to_array(row_major));
        Ok(())
    }

    /// Like [`write_to_slice`](Self::write_to_slice), narrowing to `f32`.
    ///
    /// # Errors
    /// [`MathError::InvalidArgument`] when `store` has room for fewer than 16
    /// values.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_to_slice_f32(&self, store: &mut [f32], row_major: bool) -> Result<()> {
        let dst = store
            .get_mut(..LEN)
            .ok_or(MathError::InvalidArgument("matrix store needs room for 16 values"))?;
        for (d, v) in dst.iter_mut().zip(self.to_array(row_major)) {
            *d = v as f32;
        }
        Ok(())
    }

    /// Column-major `f32` copy, ready for GPU upload.
    #[allow(clippy::cast_possible_truncation)]
    pub fn column_major_f32(&self) -> [f32; LEN] {
        self.to_array(false).map(|v| v as f32)
    }

    /// Identity with `rotation` in the upper-left 3×3 block.
    pub fn from_matrix3(rotation: &Matrix3) -> Self {
        let mut out = Self::IDENTITY;
        out.set_matrix3(rotation);
        out
    }

    /// Overwrites the upper-left 3×3 block, leaving row/column 3 alone.
    pub fn set_matrix3(&mut self, block: &Matrix3) -> &mut Self {
        for (dst, src) in self.m.iter_mut().zip(block.to_rows()) {
            dst[..3].copy_from_slice(&src);
        }
        self
    }

    /// Upper-left 3×3 block.
    pub fn to_matrix3(&self) -> Matrix3 {
        let m = &self.m;
        Matrix3::from_rows([
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ])
    }

    /// Rotation matrix equivalent to `q`.
    pub fn from_quaternion(q: &Quaternion) -> Self {
        q.to_rotation_matrix4()
    }

    /// Rotation of `angle` radians about `axis` (normalized here).
    pub fn from_angle_axis(angle: f64, axis: Vector3) -> Self {
        Self::from_matrix3(&Matrix3::from_angle_axis(angle, axis))
    }

    /// Rotation of `angle` radians about an already-normalized `axis`.
    pub fn from_angle_normal_axis(angle: f64, axis: Vector3) -> Self {
        Self::from_matrix3(&Matrix3::from_angle_normal_axis(angle, axis))
    }

    /// Resets to the identity.
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Post-multiplies by a rotation of `angle` radians about the normalized
    /// axis `(x, y, z)`; column 3 is unaffected.
    pub fn apply_rotation(&mut self, angle: f64, x: f64, y: f64, z: f64) -> &mut Self {
        let r = Matrix3::from_angle_normal_axis(angle, Vector3::new(x, y, z)).to_rows();
        for row in &mut self.m {
            let (a, b, c) = (row[0], row[1], row[2]);
            for (col, cell) in row.iter_mut().take(3).enumerate() {
                *cell = a * r[0][col] + b * r[1][col] + c * r[2][col];
            }
        }
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

    /// Post-multiplies by a translation: `self · T(x, y, z)`.
    pub fn apply_translation_post(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        for row in &mut self.m {
            row[3] += row[0] * x + row[1] * y + row[2] * z;
        }
        self
    }

    /// Pre-multiplies by a translation: `T(x, y, z) · self`.
    pub fn apply_translation_pre(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        let bottom = self.m[3];
        for (row, t) in self.m.iter_mut().take(3).zip([x, y, z]) {
            for (cell, b) in row.iter_mut().zip(bottom) {
                *cell += t * b;
            }
        }
        self
    }

    /// Element at `(row, column)`.
    pub fn value(&self, row: usize, column: usize) -> Result<f64> {
        check_index(row, 4)?;
        check_index(column, 4)?;
        Ok(self.m[row][column])
    }

    /// Overwrites the element at `(row, column)`.
    pub fn set_value(&mut self, row: usize, column: usize, value: f64) -> Result<&mut Self> {
        check_index(row, 4)?;
        check_index(column, 4)?;
        self.m[row][column] = value;
        Ok(self)
    }

    /// Row `index` as a vector.
    pub fn row(&self, index: usize) -> Result<Vector4> {
        check_index(index, 4)?;
        Ok(Vector4::from(self.m[index]))
    }

    /// Column `index` as a vector.
    pub fn column(&self, index: usize) -> Result<Vector4> {
        check_index(index, 4)?;
        Ok(Vector4::from(self.m.map(|row| row[index])))
    }

    /// Overwrites row `index`.
    pub fn set_row(&mut self, index: usize, row: Vector4) -> Result<&mut Self> {
        check_index(index, 4)?;
        self.m[index] = row.to_array();
        Ok(self)
    }

    /// Overwrites column `index`.
    pub fn set_column(&mut self, index: usize, column: Vector4) -> Result<&mut Self> {
        check_index(index, 4)?;
        for (row, value) in self.m.iter_mut().zip(column.to_array()) {
            row[index] = value;
        }
        Ok(self)
    }

    /// Rows as nested arrays.
    pub const fn to_rows(self) -> [[f64; 4]; 4] {
        self.m
    }

    /// Matrix product `self · rhs`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (r, out_row) in out.iter_mut().enumerate() {
            for (c, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
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
    pub fn multiply_diagonal_pre(&self, v: Vector4) -> Self {
        let mut out = self.m;
        for (row, factor) in out.iter_mut().zip(v.to_array()) {
            *row = row.map(|x| x * factor);
        }
        Self::from_rows(out)
    }

    /// `self · diag(v)`: column `j` scaled by `v[j]`.
    pub fn multiply_diagonal_post(&self, v: Vector4) -> Self {
        let s = v.to_array();
        Self::from_rows(
            self.m
                .map(|row| [row[0] * s[0], row[1] * s[1], row[2] * s[2], row[3] * s[3]]),
        )
    }

    /// Scales each column by the matching component of `scale`.
    pub fn scale(&self, scale: Vector4) -> Self {
        self.multiply_diagonal_post(scale)
    }

    /// Scales each column in place.
    pub fn scale_local(&mut self, scale: Vector4) -> &mut Self {
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

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in self.m.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                out[c][r] = *value;
            }
        }
        Self::from_rows(out)
    }

    /// Transposes in place.
    pub fn transpose_local(&mut self) -> &mut Self {
        *self = self.transpose();
        self
    }

    /// 2×2 minors of the top (`a`) and bottom (`b`) row pairs, plus the
    /// determinant assembled from them.
    fn block_minors(&self) -> ([f64; 6], [f64; 6], f64) {
        let m = &self.m;
        let a = [
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
            m[0][0] * m[1][2] - m[0][2] * m[1][0],
            m[0][0] * m[1][3] - m[0][3] * m[1][0],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
            m[0][1] * m[1][3] - m[0][3] * m[1][1],
            m[0][2] * m[1][3] - m[0][3] * m[1][2],
        ];
        let b = [
            m[2][0] * m[3][1] - m[2][1] * m[3][0],
            m[2][0] * m[3][2] - m[2][2] * m[3][0],
            m[2][0] * m[3][3] - m[2][3] * m[3][0],
            m[2][1] * m[3][2] - m[2][2] * m[3][1],
            m[2][1] * m[3][3] - m[2][3] * m[3][1],
            m[2][2] * m[3][3] - m[2][3] * m[3][2],
        ];
        let det = a[0] * b[5] - a[1] * b[4] + a[2] * b[3] + a[3] * b[2] - a[4] * b[1]
            + a[5] * b[0];
        (a, b, det)
    }

    fn adjugate_from_minors(&self, a: &[f64; 6], b: &[f64; 6]) -> Self {
        let m = &self.m;
        Self::from_rows([
            [
                m[1][1] * b[5] - m[1][2] * b[4] + m[1][3] * b[3],
                -m[0][1] * b[5] + m[0][2] * b[4] - m[0][3] * b[3],
                m[3][1] * a[5] - m[3][2] * a[4] + m[3][3] * a[3],
                -m[2][1] * a[5] + m[2][2] * a[4] - m[2][3] * a[3],
            ],
            [
                -m[1][0] * b[5] + m[1][2] * b[2] - m[1][3] * b[1],
                m[0][0] * b[5] - m[0][2] * b[2] + m[0][3] * b[1],
                -m[3][0] * a[5] + m[3][2] * a[2] - m[3][3] * a[1],
                m[2][0] * a[5] - m[2][2] * a[2] + m[2][3] * a[1],
            ],
            [
                m[1][0] * b[4] - m[1][1] * b[2] + m[1][3] * b[0],
                -m[0][0] * b[4] + m[0][1] * b[2] - m[0][3] * b[0],
                m[3][0] * a[4] - m[3][1] * a[2] + m[3][3] * a[0],
                -m[2][0] * a[4] + m[2][1] * a[2] - m[2][3] * a[0],
            ],
            [
                -m[1][0] * b[3] + m[1][1] * b[1] - m[1][2] * b[0],
                m[0][0] * b[3] - m[0][1] * b[1] + m[0][2] * b[0],
                -m[3][0] * a[3] + m[3][1] * a[1] - m[3][2] * a[0],
                m[2][0] * a[3] - m[2][1] * a[1] + m[2][2] * a[0],
            ],
        ])
    }

    /// Determinant.
    pub fn determinant(&self) -> f64 {
        self.block_minors().2
    }

    /// Classical adjoint (transposed cofactor matrix).
    pub fn adjugate(&self) -> Self {
        let (a, b, _) = self.block_minors();
        self.adjugate_from_minors(&a, &b)
    }

    /// Replaces `self` with its adjugate.
    pub fn adjugate_local(&mut self) -> &mut Self {
        *self = self.adjugate();
        self
    }

    /// Inverse via 2×2 block cofactors.
    ///
    /// # Errors
    /// [`MathError::SingularMatrix`] when `|det| <= EPSILON`.
    pub fn invert(&self) -> Result<Self> {
        let (a, b, det) = self.block_minors();
        if det.abs() <= EPSILON {
            debug!(determinant = det, "refusing to invert singular 4x4 matrix");
            return Err(MathError::SingularMatrix { determinant: det });
        }
        Ok(self.adjugate_from_minors(&a, &b).multiply_scalar(1.0 / det))
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
    pub fn apply_pre(&self, v: Vector4) -> Vector4 {
        self.transpose().apply_post(v)
    }

    /// Column-vector product `M · v`.
    pub fn apply_post(&self, v: Vector4) -> Vector4 {
        let v = v.to_array();
        Vector4::from(
            self.m
                .map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3]),
        )
    }

    /// Transforms a point (`w = 1`, no perspective divide).
    pub fn apply_post_point(&self, p: Vector3) -> Vector3 {
        self.apply_post(Vector4::from_vector3(p, 1.0)).xyz()
    }

    /// Transforms a direction (`w = 0`, translation ignored).
    pub fn apply_post_vector(&self, v: Vector3) -> Vector3 {
        self.apply_post(Vector4::from_vector3(v, 0.0)).xyz()
    }

    /// Exact comparison against [`IDENTITY`](Self::IDENTITY).
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// `true` when the rows are unit length and mutually perpendicular,
    /// each product within [`ZERO_TOLERANCE`].
    pub fn is_orthonormal(&self) -> bool {
        let rows = self.m.map(Vector4::from);
        rows.iter().enumerate().all(|(i, a)| {
            rows.iter().enumerate().all(|(j, b)| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (a.dot(*b) - expected).abs() <= ZERO_TOLERANCE
            })
        })
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

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[[f64; 4]; 4]> for Matrix4 {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        Self::from_rows(rows)
    }
}

impl Mul for Matrix4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;
    fn mul(self, rhs: Vector4) -> Vector4 {
        self.apply_post(rhs)
    }
}

impl Mul<f64> for Matrix4 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        self.multiply_scalar(rhs)
    }
}

impl Add for Matrix4 {
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

impl Sub for Matrix4 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + rhs * -1.0
    }
}

crate::impl_poolable!(Matrix4, new = Matrix4::IDENTITY, recycle_to = Matrix4::IDENTITY);

/// Named-field persisted form; omitted entries fall back to the identity.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct Matrix4Capsule {
    m00: f64,
    m01: f64,
    m02: f64,
    m03: f64,
    m10: f64,
    m11: f64,
    m12: f64,
    m13: f64,
    m20: f64,
    m21: f64,
    m22: f64,
    m23: f64,
    m30: f64,
    m31: f64,
    m32: f64,
    m33: f64,
}

impl Default for Matrix4Capsule {
    fn default() -> Self {
        Self::from(Matrix4::IDENTITY)
    }
}

impl From<Matrix4> for Matrix4Capsule {
    fn from(value: Matrix4) -> Self {
        let [[m00, m01, m02, m03], [m10, m11, m12, m13], [m20, m21, m22, m23], [m30, m31, m32, m33]] =
            value.m;
        Self {
            m00,
            m01,
            m02,
            m03,
            m10,
            m11,
            m12,
            m13,
            m20,
            m21,
            m22,
            m23,
            m30,
            m31,
            m32,
            m33,
        }
    }
}

impl From<Matrix4Capsule> for Matrix4 {
    fn from(c: Matrix4Capsule) -> Self {
        Self::from_rows([
            [c.m00, c.m01, c.m02, c.m03],
            [c.m10, c.m11, c.m12, c.m13],
            [c.m20, c.m21, c.m22, c.m23],
            [c.m30, c.m31, c.m32, c.m33],
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    fn sample() -> Matrix4 {
        Matrix4::from_rows([
            [2.0, 0.0, 1.0, 3.0],
            [1.0, 3.0, 0.0, -1.0],
            [0.0, 1.0, 4.0, 2.0],
            [1.0, 0.0, 0.0, 1.0],
        ])
    }

    #[test]
    fn inverse_times_self_is_identity() {
        let m = sample();
        let inv = m.invert().unwrap();
        assert!(m.multiply(&inv).approx_eq(&Matrix4::IDENTITY, EPS));
        assert!(inv.multiply(&m).approx_eq(&Matrix4::IDENTITY, EPS));
    }

    #[test]
    fn duplicate_rows_are_singular() {
        let mut m = sample();
        let first = m.row(0).unwrap();
        m.set_row(2, first).unwrap();
        let before = m;
        match m.invert_local() {
            Err(MathError::SingularMatrix { determinant }) => assert!(determinant.abs() <= EPSILON),
            other => panic!("expected singular matrix, got {other:?}"),
        }
        assert_eq!(m, before);
    }

    #[test]
    fn adjugate_relates_to_determinant() {
        let m = sample();
        let det = m.determinant();
        assert!(m
            .multiply(&m.adjugate())
            .approx_eq(&Matrix4::IDENTITY.multiply_scalar(det), EPS));
    }

    #[test]
    fn flat_order_is_explicit() {
        let values: Vec<f64> = (0..16).map(f64::from).collect();
        let rm = Matrix4::from_slice(&values, true).unwrap();
        let cm = Matrix4::from_slice(&values, false).unwrap();
        assert_eq!(rm.value(0, 1), Ok(1.0));
        assert_eq!(cm.value(1, 0), Ok(1.0));
        assert_eq!(cm, rm.transpose());

        let mut out = [0.0; 17];
        cm.write_to_slice(&mut out, false).unwrap();
        assert_eq!(&out[..16], values.as_slice());
        assert_eq!(out[16], 0.0);
    }

    #[test]
    fn short_buffers_are_rejected() {
        assert!(matches!(
            Matrix4::from_slice(&[0.0; 15], true),
            Err(MathError::InvalidArgument(_))
        ));
        let mut short = [0.0_f32; 8];
        assert!(Matrix4::IDENTITY.write_to_slice_f32(&mut short, true).is_err());
        assert_eq!(short, [0.0; 8]);
    }

    #[test]
    fn column_major_f32_puts_translation_last() {
        let mut m = Matrix4::IDENTITY;
        m.apply_translation_post(4.0, 5.0, 6.0);
        let gl = m.column_major_f32();
        assert_eq!(&gl[12..], &[4.0, 5.0, 6.0, 1.0]);
        let back = Matrix4::from_slice_f32(&gl, false).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn axis_rotations_include_bottom_row() {
        let mut m = sample();
        let angle = 0.6;
        let expected = m.multiply(&Matrix4::from_angle_axis(angle, Vector3::UNIT_Z));
        m.apply_rotation_z(angle);
        assert!(m.approx_eq(&expected, EPS));

        let mut m = sample();
        let expected = m.multiply(&Matrix4::from_angle_axis(angle, Vector3::UNIT_X));
        m.apply_rotation_x(angle);
        assert!(m.approx_eq(&expected, EPS));

        let mut m = sample();
        let expected = m.multiply(&Matrix4::from_angle_axis(angle, Vector3::UNIT_Y));
        m.apply_rotation_y(angle);
        assert!(m.approx_eq(&expected, EPS));

        let mut m = sample();
        let axis = Vector3::new(1.0, 2.0, 2.0).normalize();
        let expected = m.multiply(&Matrix4::from_angle_normal_axis(angle, axis));
        m.apply_rotation(angle, axis.x(), axis.y(), axis.z());
        assert!(m.approx_eq(&expected, EPS));
    }

    #[test]
    fn translations_pre_and_post() {
        let r = Matrix4::from_angle_axis(core::f64::consts::FRAC_PI_2, Vector3::UNIT_Z);

        let mut post = r;
        post.apply_translation_post(1.0, 0.0, 0.0);
        // Rotate after translating: +X offset becomes +Y.
        assert!(post
            .apply_post_point(Vector3::ZERO)
            .approx_eq(&Vector3::UNIT_Y, EPS));

        let mut pre = r;
        pre.apply_translation_pre(1.0, 0.0, 0.0);
        assert!(pre
            .apply_post_point(Vector3::ZERO)
            .approx_eq(&Vector3::UNIT_X, EPS));
    }

    #[test]
    fn matrix3_block_round_trip() {
        let r = Matrix3::from_angles(0.1, 0.2, 0.3);
        let m = Matrix4::from_matrix3(&r);
        assert_eq!(m.to_matrix3(), r);
        assert!(m.is_orthonormal());
        assert_eq!(m.row(3).unwrap(), Vector4::UNIT_W);
        let q = Quaternion::from_rotation_matrix(&r);
        assert!(Matrix4::from_quaternion(&q).approx_eq(&m, EPS));
    }

    #[test]
    fn pre_application_uses_rows() {
        let m = sample();
        let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(m.apply_pre(v), m.transpose().apply_post(v));
        assert_eq!(m.column(3).unwrap(), Vector4::new(3.0, -1.0, 2.0, 1.0));
    }

    #[test]
    fn capsule_round_trip() {
        let text = serde_json::to_string(&sample()).unwrap();
        assert!(text.contains("\"m03\":3.0"));
        assert_eq!(serde_json::from_str::<Matrix4>(&text).unwrap(), sample());
        let partial: Matrix4 = serde_json::from_str(r#"{"m23": 7.0}"#).unwrap();
        assert_eq!(partial.value(2, 3), Ok(7.0));
        assert_eq!(partial.value(3, 3), Ok(1.0));
    }
}
