// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-order binary form for math values.
//!
//! Layout rules:
//! - Every scalar is a big-endian IEEE-754 `f64` (8 bytes); flags are one
//!   byte each (`0` or `1`).
//! - Components are written in declaration order: vectors `x, y, z, w`,
//!   quaternions `x, y, z, w`, matrices row by row.
//! - There is no framing or version tag; the reader must know the type.
//!
//! A [`Transform`] writes its matrix, scale and translation followed by the
//! identity / rotation / uniform-scale flags. The flags are read back for
//! layout compatibility but the kind is recomputed from the data.

use bytes::{Buf, BufMut};

use crate::error::{MathError, Result};
use crate::{Matrix3, Matrix4, Quaternion, Transform, Vector2, Vector3, Vector4};

const F64_BYTES: usize = 8;

/// Values with a fixed binary layout.
pub trait Externalizable: Sized {
    /// Number of bytes written by [`write_external`](Self::write_external).
    const ENCODED_LEN: usize;

    /// Appends the binary form to `buf`.
    fn write_external<B: BufMut>(&self, buf: &mut B);

    /// Reads a value written by [`write_external`](Self::write_external).
    ///
    /// # Errors
    /// [`MathError::Truncated`] when `buf` holds fewer than
    /// [`ENCODED_LEN`](Self::ENCODED_LEN) bytes; nothing is consumed then.
    /// Types with construction rules report violations as they would when
    /// built directly (a [`Transform`] rejects a zero scale).
    fn read_external<B: Buf>(buf: &mut B) -> Result<Self>;
}

fn ensure_remaining<B: Buf>(buf: &B, needed: usize) -> Result<()> {
    let remaining = buf.remaining();
    if remaining < needed {
        return Err(MathError::Truncated { needed, remaining });
    }
    Ok(())
}

fn read_f64s<const N: usize, B: Buf>(buf: &mut B) -> [f64; N] {
    let mut out = [0.0; N];
    for v in &mut out {
        *v = buf.get_f64();
    }
    out
}

macro_rules! externalize_components {
    ($ty:ty, $len:literal, $to:expr, $from:expr) => {
        impl Externalizable for $ty {
            const ENCODED_LEN: usize = $len * F64_BYTES;

            fn write_external<B: BufMut>(&self, buf: &mut B) {
                let to: fn(&$ty) -> [f64; $len] = $to;
                for v in to(self) {
                    buf.put_f64(v);
                }
            }

            fn read_external<B: Buf>(buf: &mut B) -> Result<Self> {
                ensure_remaining(buf, Self::ENCODED_LEN)?;
                let from: fn([f64; $len]) -> $ty = $from;
                Ok(from(read_f64s(buf)))
            }
        }
    };
}

externalize_components!(Vector2, 2, |v| v.to_array(), Vector2::from);
externalize_components!(Vector3, 3, |v| v.to_array(), Vector3::from);
externalize_components!(Vector4, 4, |v| v.to_array(), Vector4::from);
externalize_components!(Quaternion, 4, |q| q.to_array(), |[x, y, z, w]| {
    Quaternion::new(x, y, z, w)
});
externalize_components!(Matrix3, 9, |m| m.to_array(), Matrix3::from_row_major);
externalize_components!(Matrix4, 16, |m| m.to_array(true), |v| {
    let rows = [
        [v[0], v[1], v[2], v[3]],
        [v[4], v[5], v[6], v[7]],
        [v[8], v[9], v[10], v[11]],
        [v[12], v[13], v[14], v[15]],
    ];
    Matrix4::from_rows(rows)
});

impl Externalizable for Transform {
    const ENCODED_LEN: usize = Matrix3::ENCODED_LEN + 2 * Vector3::ENCODED_LEN + 3;

    fn write_external<B: BufMut>(&self, buf: &mut B) {
        self.matrix().write_external(buf);
        self.scale().write_external(buf);
        self.translation().write_external(buf);
        buf.put_u8(u8::from(self.is_identity()));
        buf.put_u8(u8::from(self.is_rotation_matrix()));
        buf.put_u8(u8::from(self.is_uniform_scale()));
    }

    fn read_external<B: Buf>(buf: &mut B) -> Result<Self> {
        ensure_remaining(buf, Self::ENCODED_LEN)?;
        let matrix = Matrix3::read_external(buf)?;
        let scale = Vector3::read_external(buf)?;
        let translation = Vector3::read_external(buf)?;
        buf.advance(3);
        Self::from_parts(matrix, scale, translation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use bytes::BytesMut;

    use super::*;
    use crate::TransformKind;

    #[test]
    fn vector_layout_is_big_endian_in_order() {
        let mut buf = BytesMut::new();
        Vector3::new(1.0, -2.0, 0.5).write_external(&mut buf);
        assert_eq!(buf.len(), Vector3::ENCODED_LEN);
        assert_eq!(&buf[..8], &1.0f64.to_be_bytes());
        assert_eq!(&buf[8..16], &(-2.0f64).to_be_bytes());
        let back = Vector3::read_external(&mut buf.freeze()).unwrap();
        assert_eq!(back, Vector3::new(1.0, -2.0, 0.5));
    }

    #[test]
    fn short_input_reports_truncation() {
        let mut buf = BytesMut::new();
        Quaternion::IDENTITY.write_external(&mut buf);
        let mut short = &buf[..20];
        assert_eq!(
            Quaternion::read_external(&mut short),
            Err(MathError::Truncated {
                needed: 32,
                remaining: 20
            })
        );
        assert_eq!(short.len(), 20);
    }

    #[test]
    fn matrix4_rows_first() {
        let m = Matrix4::IDENTITY.multiply_scalar(2.0);
        let mut buf = Vec::new();
        m.write_external(&mut buf);
        assert_eq!(buf.len(), 128);
        assert_eq!(&buf[..8], &2.0f64.to_be_bytes());
        assert_eq!(Matrix4::read_external(&mut buf.as_slice()).unwrap(), m);
    }

    #[test]
    fn transform_flags_trail_and_are_recomputed() {
        let mut t = Transform::new();
        t.set_translation_xyz(1.0, 2.0, 3.0);
        t.set_scale_xyz(1.0, 2.0, 1.0).unwrap();
        let mut buf = Vec::new();
        t.write_external(&mut buf);
        assert_eq!(buf.len(), Transform::ENCODED_LEN);
        assert_eq!(&buf[buf.len() - 3..], &[0, 1, 0]);

        // Lie about the flags; the kind still follows the data.
        let n = buf.len();
        buf[n - 3] = 1;
        let back = Transform::read_external(&mut buf.as_slice()).unwrap();
        assert_eq!(back.kind(), TransformKind::RotationScale);
        assert_eq!(back, t);
    }

    #[test]
    fn transform_with_zero_scale_is_rejected_on_read() {
        let mut buf = Vec::new();
        Matrix3::IDENTITY.write_external(&mut buf);
        Vector3::ZERO.write_external(&mut buf);
        Vector3::UNIT_X.write_external(&mut buf);
        buf.extend_from_slice(&[0, 1, 1]);
        assert_eq!(buf.len(), Transform::ENCODED_LEN);
        assert_eq!(
            Transform::read_external(&mut buf.as_slice()),
            Err(MathError::InvalidArgument("scale may not be ZERO"))
        );
    }
}
