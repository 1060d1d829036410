// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod common;

use core::f64::consts::FRAC_PI_2;

use common::{approx_eq, approx_eq3, approx_eq_m4, trs, TOL};
use warp_math::{
    MathError, Matrix3, Matrix4, Quaternion, Transform, TransformKind, ValidatingTransform,
    Vector3, Vector4,
};

#[test]
fn uniform_scale_fast_path_matches_matrix_form() {
    let a = trs(Vector3::UNIT_Y, FRAC_PI_2, Vector3::splat(2.0), Vector3::UNIT_X);
    let mut b = Transform::new();
    b.set_translation(Vector3::UNIT_Y);

    let ab = a.multiply(&b);
    assert!(ab.is_rotation_matrix());
    assert!(ab.is_uniform_scale());
    assert_eq!(ab.kind(), TransformKind::UniformRotationScale);

    // R_A·S_A·M_B + T_A built by hand from 4x4 matrices.
    let mut expected = Matrix4::from_matrix3(&Matrix3::from_angle_axis(FRAC_PI_2, Vector3::UNIT_Y));
    expected = expected.multiply(&Matrix4::from_matrix3(&Matrix3::from_diagonal(Vector3::splat(2.0))));
    expected = expected.multiply(&b.homogeneous_matrix());
    expected.apply_translation_pre(1.0, 0.0, 0.0);
    approx_eq_m4(&ab.homogeneous_matrix(), &expected, TOL);

    // Rotating (0, 1, 0) about Y leaves it alone; scale 2 then shift by T_A.
    approx_eq3(ab.translation(), Vector3::new(1.0, 2.0, 0.0));
    approx_eq(ab.scale().x(), 2.0);
}

#[test]
fn singular_matrix4_inversion_fails() {
    let m = Matrix4::from_rows([
        [1.0, 2.0, 3.0, 4.0],
        [1.0, 2.0, 3.0, 4.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    match m.invert() {
        Err(MathError::SingularMatrix { determinant }) => assert!(determinant.abs() <= 1e-12),
        other => panic!("expected singular-matrix error, got {other:?}"),
    }
    let mut copy = m;
    assert!(copy.invert_local().is_err());
    assert_eq!(copy, m);
}

#[test]
fn zero_scale_rejected_without_side_effects() {
    let mut t = trs(Vector3::UNIT_Z, 0.4, Vector3::new(1.0, 2.0, 3.0), Vector3::ONE);
    let before = t;
    assert_eq!(
        t.set_scale_xyz(0.0, 0.0, 0.0).unwrap_err(),
        MathError::InvalidArgument("scale may not be ZERO")
    );
    assert_eq!(t, before);
}

#[test]
fn rotation_flag_follows_matrix_content() {
    let mut t = Transform::new();
    t.set_rotation_matrix(&Matrix3::from_angle_axis(1.1, Vector3::new(1.0, 1.0, 0.0)));
    assert!(t.is_rotation_matrix());
    t.set_scale_uniform(3.0).unwrap();

    let mut shear = Matrix3::IDENTITY;
    shear.set_value(0, 1, 0.5).unwrap();
    t.set_rotation_matrix(&shear);
    assert!(!t.is_rotation_matrix());
    assert!(matches!(
        t.set_scale_uniform(2.0),
        Err(MathError::IllegalState(_))
    ));
}

#[test]
fn identity_laws() {
    let t = trs(
        Vector3::new(0.2, -1.0, 0.5),
        2.0,
        Vector3::new(0.5, 1.5, 2.0),
        Vector3::new(-3.0, 4.0, 1.0),
    );
    assert!(Transform::IDENTITY.multiply(&t).approx_eq(&t, TOL));
    assert!(t.multiply(&Transform::IDENTITY).approx_eq(&t, TOL));
    assert_eq!(Transform::IDENTITY.invert().unwrap(), Transform::IDENTITY);
}

#[test]
fn parent_child_chain_round_trips_points() {
    let parent = trs(Vector3::UNIT_Y, 0.7, Vector3::splat(1.5), Vector3::new(10.0, 0.0, 0.0));
    let child = trs(Vector3::UNIT_X, -0.3, Vector3::new(1.0, 2.0, 0.5), Vector3::new(0.0, 1.0, 0.0));
    let world = parent.multiply(&child);
    let local = Vector3::new(0.25, -0.5, 2.0);
    let mut p = local;
    world.apply_forward(&mut p);
    approx_eq3(p, parent.forward_point(child.forward_point(local)));
    world.apply_inverse(&mut p).unwrap();
    approx_eq3(p, local);
}

#[test]
fn homogeneous_form_agrees_with_forward() {
    let t = trs(Vector3::UNIT_Z, 0.9, Vector3::new(2.0, 3.0, 4.0), Vector3::new(1.0, 2.0, 3.0));
    let m = t.homogeneous_matrix();
    let p = Vector3::new(-1.0, 0.5, 2.0);
    approx_eq3(m.apply_post_point(p), t.forward_point(p));
    let v4 = m.apply_post(Vector4::from_vector3(p, 0.0));
    approx_eq3(v4.xyz(), t.forward_vector(p));

    let mut gl = [0.0f32; 16];
    t.write_gl_apply_matrix_f32(&mut gl).unwrap();
    assert_eq!(gl, m.column_major_f32());
}

#[test]
fn validating_transform_guards_composition_results() {
    let mut v = ValidatingTransform::new();
    v.set_rotation_quaternion(&Quaternion::from_angle_axis(0.5, Vector3::UNIT_Y))
        .unwrap()
        .set_translation(Vector3::new(1.0, 2.0, 3.0))
        .unwrap();
    let huge = trs(Vector3::UNIT_X, 0.0, Vector3::splat(f64::MAX), Vector3::splat(f64::MAX));
    assert!(matches!(
        v.multiply(&huge),
        Err(MathError::InvalidNumericState("multiply"))
    ));
    assert!(v.is_valid());
}
