// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    rust_2018_idioms,
    missing_docs,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate, clippy::float_cmp)]
#![doc = r"Geometry primitives for Echo, built on `warp-math`.

This crate provides:
- Planes with side classification and reflection (`Plane`, `Side`).
- Infinite lines, rays and bounded segments (`Line3`, `Ray3`, `LineSegment3`).
- Triangles with cached center and normal (`Triangle`).
- Integer screen rectangles and 3D parallelograms (`Rectangle2`, `Rectangle3`).

Design notes:
- Every primitive is `Copy` and owns a thread-local pool through
  `warp_math::impl_poolable!`; pooled instances are never reset on reuse.
- Intersection and distance queries borrow `warp_math::Pooled` temporaries
  internally and only ever return plain values to the caller.
- Double precision throughout, matching `warp-math`.
"]

/// Infinite lines, rays and line segments.
pub mod line;
/// Planes and point classification.
pub mod plane;
/// 2D integer rectangles and 3D rectangles.
pub mod rectangle;
/// Triangles.
pub mod triangle;

pub use line::{Line3, LineSegment3, Ray3};
pub use plane::{Plane, Side};
pub use rectangle::{Rectangle2, Rectangle3};
pub use triangle::Triangle;
