// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Row-major double-precision matrices.
//!
//! Both types address elements as `(row, column)` and multiply column
//! vectors on the right (`M·v`, see `apply_post`). Inversion fails with
//! [`MathError::SingularMatrix`](crate::MathError::SingularMatrix) when
//! `|det| <= EPSILON` instead of producing non-finite entries.

mod mat3;
mod mat4;

pub use mat3::Matrix3;
pub use mat4::Matrix4;
