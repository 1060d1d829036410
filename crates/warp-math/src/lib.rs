// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! warp-math: mutable, allocation-averse 3D math for Echo.
//!
//! The crate provides double-precision vectors, 3×3/4×4 matrices,
//! quaternions and an affine [`Transform`] whose representation
//! ([`TransformKind`]) selects the composition and inversion algorithm.
//!
//! Per-frame code that wants to avoid allocator pressure borrows heap-backed
//! temporaries from a thread-local [`ObjectPool`] through [`Pooled`] guards,
//! which hand the instance back automatically when dropped. Pool storage is
//! never shared between threads, so no locking is involved.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::float_cmp
)]
// Exact float comparisons are intentional: identity and uniform-scale flags
// are defined on exact component equality.

/// Thread-local math configuration (pool switches and sizes).
pub mod config;
/// Error taxonomy shared by every math operation.
pub mod error;
/// Fixed-order binary encoding for math values.
pub mod external;
/// 3×3 and 4×4 double-precision matrices.
pub mod matrix;
/// Thread-local object pools and scoped temporaries.
pub mod pool;
/// Unit quaternions for rotations.
pub mod quat;
/// Affine transforms with tracked structure.
pub mod transform;
/// Scalar constants and helpers.
pub mod util;
/// Two-, three- and four-component vectors.
pub mod vector;

pub use config::MathConfig;
pub use error::{MathError, Result};
pub use external::Externalizable;
pub use matrix::{Matrix3, Matrix4};
pub use pool::{fetch_temp, release_temp, ObjectPool, Poolable, Pooled};
pub use quat::Quaternion;
pub use transform::{Transform, TransformKind, ValidatingTransform};
pub use util::{ALLOWED_DEVIANCE, EPSILON, ZERO_TOLERANCE};
pub use vector::{Vector2, Vector3, Vector4};
