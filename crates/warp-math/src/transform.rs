// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Affine transforms built from a 3×3 matrix, a per-axis scale and a
//! translation.
//!
//! A [`Transform`] maps a point `p` to `M·(S∘p) + T` while its matrix is a
//! rotation, and to `M·p + T` once the matrix has become a general linear map
//! (at which point the scale is folded into the matrix and reads as ONE).
//! Which of those forms applies is tracked by [`TransformKind`], derived from
//! the content after every mutation so the accessors can never disagree with
//! the data.

use core::ops::{Deref, Mul};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{MathError, Result};
use crate::pool::Pooled;
use crate::{Matrix3, Matrix4, Quaternion, Vector3};

/// Representation currently held by a [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Identity matrix, unit scale, zero translation.
    Identity,
    /// Orthonormal matrix with equal scale on all three axes.
    UniformRotationScale,
    /// Orthonormal matrix with an independent scale per axis.
    RotationScale,
    /// Arbitrary linear map; the scale is folded into the matrix.
    General,
}

impl TransformKind {
    /// `true` for [`Identity`](Self::Identity).
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::Identity)
    }

    /// `true` when the matrix is a pure rotation and `scale` is meaningful.
    pub const fn is_rotation_matrix(self) -> bool {
        !matches!(self, Self::General)
    }

    /// `true` when all three scale components are equal.
    pub const fn is_uniform_scale(self) -> bool {
        matches!(self, Self::Identity | Self::UniformRotationScale)
    }
}

/// Rotation (or general matrix), scale and translation applied as one unit.
///
/// - Composition follows column-vector order: `a.multiply(&b)` applies `b`
///   first, then `a`.
/// - Scale can only be set while the matrix is a rotation; see
///   [`set_scale`](Self::set_scale).
/// - After a composition that produces a [`TransformKind::General`] result
///   the scale reads as ONE; use [`homogeneous_matrix`](Self::homogeneous_matrix)
///   to observe the full map.
///
/// # Examples
/// ```
/// use warp_math::{Quaternion, Transform, Vector3};
/// let mut t = Transform::new();
/// t.set_rotation_quaternion(&Quaternion::from_angle_axis(core::f64::consts::FRAC_PI_2, Vector3::UNIT_Z))
///     .set_translation(Vector3::new(1.0, 0.0, 0.0));
/// t.set_scale_uniform(2.0).unwrap();
/// let p = t.forward_point(Vector3::UNIT_X);
/// assert!(p.approx_eq(&Vector3::new(1.0, 2.0, 0.0), 1e-12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransformCapsule", into = "TransformCapsule")]
pub struct Transform {
    matrix: Matrix3,
    scale: Vector3,
    translation: Vector3,
    kind: TransformKind,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        matrix: Matrix3::IDENTITY,
        scale: Vector3::ONE,
        translation: Vector3::ZERO,
        kind: TransformKind::Identity,
    };

    /// Creates an identity transform.
    pub const fn new() -> Self {
        Self::IDENTITY
    }

    /// Builds a transform from raw parts, deriving the kind from content.
    ///
    /// A non-orthonormal `matrix` yields [`TransformKind::General`] and the
    /// given `scale` is discarded.
    ///
    /// # Errors
    /// [`MathError::InvalidArgument`] when `matrix` is a rotation and `scale`
    /// is ZERO.
    pub fn from_parts(matrix: Matrix3, scale: Vector3, translation: Vector3) -> Result<Self> {
        if scale == Vector3::ZERO && matrix.is_orthonormal() {
            debug!("rejecting zero scale on a rotation transform");
            return Err(MathError::InvalidArgument("scale may not be ZERO"));
        }
        Ok(Self::assemble(matrix, scale, translation))
    }

    fn assemble(matrix: Matrix3, scale: Vector3, translation: Vector3) -> Self {
        let mut out = Self {
            matrix,
            scale,
            translation,
            kind: TransformKind::General,
        };
        out.update_kind(false);
        out
    }

    /// Rotation part, or the full linear map for [`TransformKind::General`].
    pub const fn matrix(&self) -> &Matrix3 {
        &self.matrix
    }

    /// Per-axis scale; ONE for [`TransformKind::General`].
    pub const fn scale(&self) -> Vector3 {
        self.scale
    }

    /// Translation applied after the linear part.
    pub const fn translation(&self) -> Vector3 {
        self.translation
    }

    /// Current representation.
    pub const fn kind(&self) -> TransformKind {
        self.kind
    }

    /// See [`TransformKind::is_identity`].
    pub const fn is_identity(&self) -> bool {
        self.kind.is_identity()
    }

    /// See [`TransformKind::is_rotation_matrix`].
    pub const fn is_rotation_matrix(&self) -> bool {
        self.kind.is_rotation_matrix()
    }

    /// See [`TransformKind::is_uniform_scale`].
    pub const fn is_uniform_scale(&self) -> bool {
        self.kind.is_uniform_scale()
    }

    /// Resets to [`IDENTITY`](Self::IDENTITY).
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Copies every field of `source`.
    pub fn set(&mut self, source: &Self) -> &mut Self {
        *self = *source;
        self
    }

    /// Sets the matrix part.
    ///
    /// The transform becomes [`TransformKind::General`] unless `rotation` is
    /// orthonormal, in which case the current scale is kept.
    pub fn set_rotation_matrix(&mut self, rotation: &Matrix3) -> &mut Self {
        self.matrix = *rotation;
        self.update_kind(false);
        self
    }

    /// Sets the matrix part from a (unit) quaternion; the result is always
    /// treated as a rotation.
    pub fn set_rotation_quaternion(&mut self, rotation: &Quaternion) -> &mut Self {
        self.matrix = rotation.to_rotation_matrix();
        self.update_kind(true);
        self
    }

    /// Sets the translation.
    pub fn set_translation(&mut self, translation: Vector3) -> &mut Self {
        self.translation = translation;
        self.refresh_identity();
        self
    }

    /// Sets the translation from components.
    pub fn set_translation_xyz(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.set_translation(Vector3::new(x, y, z))
    }

    /// Adds `offset` to the translation.
    pub fn translate(&mut self, offset: Vector3) -> &mut Self {
        self.set_translation(self.translation + offset)
    }

    /// Sets the per-axis scale.
    ///
    /// # Errors
    /// - [`MathError::IllegalState`] when the matrix is not a rotation: the
    ///   scale is already part of the general matrix.
    /// - [`MathError::InvalidArgument`] when every component is zero.
    ///
    /// The transform is unchanged on error.
    pub fn set_scale(&mut self, scale: Vector3) -> Result<&mut Self> {
        if !self.kind.is_rotation_matrix() {
            return Err(MathError::IllegalState(
                "scale is already provided by the 3x3 matrix",
            ));
        }
        if scale == Vector3::ZERO {
            return Err(MathError::InvalidArgument("scale may not be ZERO"));
        }
        self.scale = scale;
        self.update_kind(true);
        Ok(self)
    }

    /// Sets the per-axis scale from components; see [`set_scale`](Self::set_scale).
    ///
    /// # Errors
    /// As [`set_scale`](Self::set_scale).
    pub fn set_scale_xyz(&mut self, x: f64, y: f64, z: f64) -> Result<&mut Self> {
        self.set_scale(Vector3::new(x, y, z))
    }

    /// Sets the same scale on all three axes; see [`set_scale`](Self::set_scale).
    ///
    /// # Errors
    /// As [`set_scale`](Self::set_scale).
    pub fn set_scale_uniform(&mut self, scale: f64) -> Result<&mut Self> {
        self.set_scale(Vector3::splat(scale))
    }

    /// Recomputes `kind` from content. Entering the general form folds the
    /// scale away.
    fn update_kind(&mut self, rotation_guaranteed: bool) {
        self.kind = if self.translation == Vector3::ZERO
            && self.matrix.is_identity()
            && self.scale == Vector3::ONE
        {
            TransformKind::Identity
        } else if rotation_guaranteed || self.matrix.is_orthonormal() {
            let s = self.scale;
            if s.x() == s.y() && s.y() == s.z() {
                TransformKind::UniformRotationScale
            } else {
                TransformKind::RotationScale
            }
        } else {
            self.scale = Vector3::ONE;
            TransformKind::General
        };
    }

    /// Translation changes only move between identity and uniform rotation.
    fn refresh_identity(&mut self) {
        let identity = self.translation == Vector3::ZERO
            && self.matrix.is_identity()
            && self.scale == Vector3::ONE;
        self.kind = match (identity, self.kind) {
            (true, _) => TransformKind::Identity,
            (false, TransformKind::Identity) => TransformKind::UniformRotationScale,
            (false, kind) => kind,
        };
    }

    /// Linear part as a single matrix: `R·diag(S)` for rotations, `M` otherwise.
    fn linear_map(&self) -> Matrix3 {
        match self.kind {
            TransformKind::Identity => Matrix3::IDENTITY,
            TransformKind::UniformRotationScale | TransformKind::RotationScale => {
                self.matrix.multiply_diagonal_post(self.scale)
            }
            TransformKind::General => self.matrix,
        }
    }

    fn scale_singularity(&self) -> Result<()> {
        let s = self.scale;
        if s.x() == 0.0 || s.y() == 0.0 || s.z() == 0.0 {
            let determinant = s.x() * s.y() * s.z();
            debug!(?s, "refusing to invert transform with a zero scale component");
            return Err(MathError::SingularMatrix { determinant });
        }
        Ok(())
    }

    /// Maps a point from local to parent space in place.
    pub fn apply_forward(&self, point: &mut Vector3) {
        *point = self.forward_point(*point);
    }

    /// Maps a point from local to parent space.
    pub fn forward_point(&self, point: Vector3) -> Vector3 {
        match self.kind {
            TransformKind::Identity => point,
            _ => self.forward_vector(point) + self.translation,
        }
    }

    /// Maps a direction (no translation) in place.
    pub fn apply_forward_vector(&self, vector: &mut Vector3) {
        *vector = self.forward_vector(*vector);
    }

    /// Maps a direction (no translation).
    pub fn forward_vector(&self, vector: Vector3) -> Vector3 {
        match self.kind {
            TransformKind::Identity => vector,
            TransformKind::UniformRotationScale | TransformKind::RotationScale => {
                self.matrix.apply_post(vector.multiply_components(self.scale))
            }
            TransformKind::General => self.matrix.apply_post(vector),
        }
    }

    /// Maps a point from parent back to local space in place; `point` is
    /// unchanged on error.
    ///
    /// # Errors
    /// [`MathError::SingularMatrix`] when the transform is not invertible.
    pub fn apply_inverse(&self, point: &mut Vector3) -> Result<()> {
        *point = self.inverse_point(*point)?;
        Ok(())
    }

    /// Maps a point from parent back to local space.
    ///
    /// # Errors
    /// [`MathError::SingularMatrix`] when the transform is not invertible.
    pub fn inverse_point(&self, point: Vector3) -> Result<Vector3> {
        match self.kind {
            TransformKind::Identity => Ok(point),
            _ => self.inverse_vector(point - self.translation),
        }
    }

    /// Maps a direction back to local space in place; `vector` is unchanged
    /// on error.
    ///
    /// # Errors
    /// [`MathError::SingularMatrix`] when the transform is not invertible.
    pub fn apply_inverse_vector(&self, vector: &mut Vector3) -> Result<()> {
        *vector = self.inverse_vector(*vector)?;
        Ok(())
    }

    /// Maps a direction back to local space.
    ///
    /// # Errors
    /// [`MathError::SingularMatrix`] when the transform is not invertible.
    pub fn inverse_vector(&self, vector: Vector3) -> Result<Vector3> {
        match self.kind {
            TransformKind::Identity => Ok(vector),
            TransformKind::UniformRotationScale => {
                self.scale_singularity()?;
                Ok(self.matrix.apply_pre(vector) / self.scale.x())
            }
            TransformKind::RotationScale => {
                self.scale_singularity()?;
                Ok(self.matrix.apply_pre(vector).divide_components(self.scale))
            }
            TransformKind::General => {
                let mut inverse = Pooled::with_value(self.matrix);
                inverse.invert_local()?;
                Ok(inverse.apply_post(vector))
            }
        }
    }

    /// Composes `self · by`: the result applies `by` first, then `self`.
    pub fn multiply(&self, by: &Self) -> Self {
        match (self.kind, by.kind) {
            (TransformKind::Identity, _) => *by,
            (_, TransformKind::Identity) => *self,
            (
                TransformKind::UniformRotationScale,
                TransformKind::UniformRotationScale | TransformKind::RotationScale,
            ) => {
                let s = self.scale.x();
                let mut out = Self {
                    matrix: self.matrix.multiply(&by.matrix),
                    scale: by.scale * s,
                    translation: self.matrix.apply_post(by.translation) * s + self.translation,
                    kind: TransformKind::RotationScale,
                };
                out.update_kind(true);
                out
            }
            (lhs, rhs) => {
                trace!(?lhs, ?rhs, "composing transforms through the general matrix path");
                let a = Pooled::with_value(self.linear_map());
                let b = Pooled::with_value(by.linear_map());
                let mut out = Self {
                    matrix: a.multiply(&b),
                    scale: Vector3::ONE,
                    translation: a.apply_post(by.translation) + self.translation,
                    kind: TransformKind::General,
                };
                out.update_kind(false);
                out
            }
        }
    }

    /// Writes `self · by` into `store` and returns it.
    pub fn multiply_into<'a>(&self, by: &Self, store: &'a mut Self) -> &'a mut Self {
        *store = self.multiply(by);
        store
    }

    /// Inverse transform.
    ///
    /// A uniform rotation/scale inverts to another uniform rotation/scale;
    /// every other non-identity kind inverts to a general matrix.
    ///
    /// # Errors
    /// [`MathError::SingularMatrix`] when a scale component is zero or the
    /// general matrix is singular.
    pub fn invert(&self) -> Result<Self> {
        let mut out = match self.kind {
            TransformKind::Identity => return Ok(Self::IDENTITY),
            TransformKind::UniformRotationScale => {
                self.scale_singularity()?;
                let inv_scale = 1.0 / self.scale.x();
                let rotation = self.matrix.transpose();
                let mut out = Self {
                    matrix: rotation,
                    scale: Vector3::splat(inv_scale),
                    translation: -(rotation.apply_post(self.translation) * inv_scale),
                    kind: TransformKind::UniformRotationScale,
                };
                out.update_kind(true);
                return Ok(out);
            }
            TransformKind::RotationScale => {
                self.scale_singularity()?;
                Self {
                    matrix: self.linear_map().invert()?,
                    ..Self::IDENTITY
                }
            }
            TransformKind::General => Self {
                matrix: self.matrix.invert()?,
                ..Self::IDENTITY
            },
        };
        out.translation = -out.matrix.apply_post(self.translation);
        out.update_kind(false);
        Ok(out)
    }

    /// Writes the inverse into `store`; `store` is unchanged on error.
    ///
    /// # Errors
    /// As [`invert`](Self::invert).
    pub fn invert_into<'a>(&self, store: &'a mut Self) -> Result<&'a mut Self> {
        *store = self.invert()?;
        Ok(store)
    }

    /// Equivalent 4×4 matrix: linear part in the upper 3×3, translation in
    /// the last column.
    pub fn homogeneous_matrix(&self) -> Matrix4 {
        let mut rows = Matrix4::from_matrix3(&self.linear_map()).to_rows();
        let t = self.translation;
        rows[0][3] = t.x();
        rows[1][3] = t.y();
        rows[2][3] = t.z();
        Matrix4::from_rows(rows)
    }

    /// Builds a transform from a 4×4 matrix: the upper 3×3 block becomes the
    /// matrix and the last column the translation. The projective row is
    /// ignored and the scale reads as ONE.
    pub fn from_homogeneous_matrix(matrix: &Matrix4) -> Self {
        let rows = matrix.to_rows();
        Self::assemble(
            matrix.to_matrix3(),
            Vector3::ONE,
            Vector3::new(rows[0][3], rows[1][3], rows[2][3]),
        )
    }

    /// Writes the homogeneous matrix column-major, as fixed-function GL
    /// expects it.
    ///
    /// # Errors
    /// [`MathError::InvalidArgument`] when `store` holds fewer than 16 values.
    pub fn write_gl_apply_matrix(&self, store: &mut [f64]) -> Result<()> {
        self.homogeneous_matrix().write_to_slice(store, false)
    }

    /// Single-precision variant of [`write_gl_apply_matrix`](Self::write_gl_apply_matrix).
    ///
    /// # Errors
    /// [`MathError::InvalidArgument`] when `store` holds fewer than 16 values.
    pub fn write_gl_apply_matrix_f32(&self, store: &mut [f32]) -> Result<()> {
        self.homogeneous_matrix().write_to_slice_f32(store, false)
    }

    /// `true` when no field holds NaN or infinity.
    pub fn is_valid(&self) -> bool {
        self.matrix.is_finite() && self.scale.is_finite() && self.translation.is_finite()
    }

    /// Field-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.matrix.approx_eq(&other.matrix, tolerance)
            && self.scale.approx_eq(&other.scale, tolerance)
            && self.translation.approx_eq(&other.translation, tolerance)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Vector3> for Transform {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.forward_point(rhs)
    }
}

crate::impl_poolable!(Transform, new = Transform::IDENTITY, recycle_to = Transform::IDENTITY);

/// Persisted form. The flags are written for readers that expect them but
/// are recomputed from the data on load.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TransformCapsule {
    rotation: Matrix3,
    scale: Vector3,
    translation: Vector3,
    identity: bool,
    rotation_matrix: bool,
    uniform_scale: bool,
}

impl Default for TransformCapsule {
    fn default() -> Self {
        Self::from(Transform::IDENTITY)
    }
}

impl From<Transform> for TransformCapsule {
    fn from(t: Transform) -> Self {
        Self {
            rotation: t.matrix,
            scale: t.scale,
            translation: t.translation,
            identity: t.is_identity(),
            rotation_matrix: t.is_rotation_matrix(),
            uniform_scale: t.is_uniform_scale(),
        }
    }
}

impl TryFrom<TransformCapsule> for Transform {
    type Error = MathError;

    fn try_from(c: TransformCapsule) -> Result<Self> {
        Self::from_parts(c.rotation, c.scale, c.translation)
    }
}

/// [`Transform`] wrapper that refuses mutations producing NaN or infinity.
///
/// Each mutator runs on a copy; the copy is committed only if every field is
/// finite. Read access goes through `Deref`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValidatingTransform {
    inner: Transform,
}

impl ValidatingTransform {
    /// Wraps the identity transform.
    pub const fn new() -> Self {
        Self {
            inner: Transform::IDENTITY,
        }
    }

    /// Wraps `transform` after checking it.
    ///
    /// # Errors
    /// [`MathError::InvalidNumericState`] when any field is not finite.
    pub fn try_new(transform: Transform) -> Result<Self> {
        let mut out = Self::new();
        out.commit("try_new", transform)?;
        Ok(out)
    }

    /// Unwraps the validated transform.
    pub const fn into_inner(self) -> Transform {
        self.inner
    }

    fn commit(&mut self, op: &'static str, candidate: Transform) -> Result<&mut Self> {
        if !candidate.is_valid() {
            debug!(op, ?candidate, "rejecting non-finite transform");
            return Err(MathError::InvalidNumericState(op));
        }
        self.inner = candidate;
        Ok(self)
    }

    fn mutate<F>(&mut self, op: &'static str, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Transform) -> Result<()>,
    {
        let mut candidate = self.inner;
        f(&mut candidate)?;
        self.commit(op, candidate)
    }

    /// Resets to the identity.
    pub fn set_identity(&mut self) -> &mut Self {
        self.inner.set_identity();
        self
    }

    /// Copies `source`.
    ///
    /// # Errors
    /// [`MathError::InvalidNumericState`] when `source` is not finite.
    pub fn set(&mut self, source: &Transform) -> Result<&mut Self> {
        self.commit("set", *source)
    }

    /// Validated [`Transform::set_rotation_matrix`].
    ///
    /// # Errors
    /// [`MathError::InvalidNumericState`] when the result is not finite.
    pub fn set_rotation_matrix(&mut self, rotation: &Matrix3) -> Result<&mut Self> {
        self.mutate("set_rotation_matrix", |t| {
            t.set_rotation_matrix(rotation);
            Ok(())
        })
    }

    /// Validated [`Transform::set_rotation_quaternion`].
    ///
    /// # Errors
    /// [`MathError::InvalidNumericState`] when the result is not finite.
    pub fn set_rotation_quaternion(&mut self, rotation: &Quaternion) -> Result<&mut Self> {
        self.mutate("set_rotation_quaternion", |t| {
            t.set_rotation_quaternion(rotation);
            Ok(())
        })
    }

    /// Validated [`Transform::set_translation`].
    ///
    /// # Errors
    /// [`MathError::InvalidNumericState`] when the result is not finite.
    pub fn set_translation(&mut self, translation: Vector3) -> Result<&mut Self> {
        self.mutate("set_translation", |t| {
            t.set_translation(translation);
            Ok(())
        })
    }

    /// Validated [`Transform::translate`].
    ///
    /// # Errors
    /// [`MathError::InvalidNumericState`] when the result is not finite.
    pub fn translate(&mut self, offset: Vector3) -> Result<&mut Self> {
        self.mutate("translate", |t| {
            t.translate(offset);
            Ok(())
        })
    }

    /// Validated [`Transform::set_scale`].
    ///
    /// # Errors
    /// Anything [`Transform::set_scale`] reports, or
    /// [`MathError::InvalidNumericState`] when the result is not finite.
    pub fn set_scale(&mut self, scale: Vector3) -> Result<&mut Self> {
        self.mutate("set_scale", |t| t.set_scale(scale).map(|_| ()))
    }

    /// Validated [`Transform::set_scale_uniform`].
    ///
    /// # Errors
    /// As [`set_scale`](Self::set_scale).
    pub fn set_scale_uniform(&mut self, scale: f64) -> Result<&mut Self> {
        self.set_scale(Vector3::splat(scale))
    }

    /// Validated [`Transform::from_homogeneous_matrix`].
    ///
    /// # Errors
    /// [`MathError::InvalidNumericState`] when the matrix holds non-finite
    /// values in the parts that are read.
    pub fn from_homogeneous_matrix(matrix: &Matrix4) -> Result<Self> {
        Self::try_new(Transform::from_homogeneous_matrix(matrix))
    }

    /// Validated composition `self · by`.
    ///
    /// # Errors
    /// [`MathError::InvalidNumericState`] when the product is not finite.
    pub fn multiply(&self, by: &Transform) -> Result<Self> {
        let mut out = *self;
        out.commit("multiply", self.inner.multiply(by))?;
        Ok(out)
    }

    /// Validated inverse.
    ///
    /// # Errors
    /// [`MathError::SingularMatrix`] from the inversion itself, or
    /// [`MathError::InvalidNumericState`] when the inverse is not finite.
    pub fn invert(&self) -> Result<Self> {
        let mut out = *self;
        out.commit("invert", self.inner.invert()?)?;
        Ok(out)
    }
}

impl Deref for ValidatingTransform {
    type Target = Transform;

    fn deref(&self) -> &Transform {
        &self.inner
    }
}

impl From<ValidatingTransform> for Transform {
    fn from(value: ValidatingTransform) -> Self {
        value.inner
    }
}
