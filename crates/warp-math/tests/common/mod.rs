// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code, clippy::panic)]

use warp_math::{Matrix4, Transform, Vector3};

pub const TOL: f64 = 1e-9;

pub fn approx_eq(a: f64, b: f64) {
    let diff = (a - b).abs();
    assert!(diff <= TOL, "expected {b}, got {a} (diff {diff})");
}

pub fn approx_eq3(a: Vector3, b: Vector3) {
    assert!(a.approx_eq(&b, TOL), "expected {b:?}, got {a:?}");
}

pub fn approx_eq_m4(a: &Matrix4, b: &Matrix4, tol: f64) {
    assert!(a.approx_eq(b, tol), "expected {b:?}, got {a:?}");
}

/// Rotation about an arbitrary axis, non-zero scale and a translation.
pub fn trs(axis: Vector3, angle: f64, scale: Vector3, translation: Vector3) -> Transform {
    let mut t = Transform::new();
    t.set_rotation_quaternion(&warp_math::Quaternion::from_angle_axis(angle, axis))
        .set_translation(translation);
    if let Err(err) = t.set_scale(scale) {
        panic!("rotation transform must accept scale {scale:?}: {err}");
    }
    t
}
