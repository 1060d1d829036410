// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use serde::{Deserialize, Serialize};
use warp_math::Vector3;

/// Integer rectangle, typically a viewport or scissor region in pixels.
///
/// Covers `x..x + width` by `y..y + height`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Rectangle2 {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rectangle2 {
    /// Creates a rectangle from its origin and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Bottom edge.
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Width.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Overwrites all fields.
    pub fn set(&mut self, x: i32, y: i32, width: i32, height: i32) -> &mut Self {
        *self = Self::new(x, y, width, height);
        self
    }

    /// Overlap with `other`.
    ///
    /// Disjoint rectangles yield a zero or negative width or height; check
    /// [`intersects`](Self::intersects) first when that matters.
    pub fn intersection(&self, other: &Self) -> Self {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        Self::new(x1, y1, x2.saturating_sub(x1), y2.saturating_sub(y1))
    }

    /// `true` when the overlap has positive area.
    pub fn intersects(&self, other: &Self) -> bool {
        let overlap = self.intersection(other);
        overlap.width > 0 && overlap.height > 0
    }

    /// `true` when pixel `(px, py)` lies inside.
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    // Edges clamp at the i32 range.
    const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }
}

warp_math::impl_poolable!(Rectangle2, new = Rectangle2::default());

/// Parallelogram in 3D spanned from corner `a` towards `b` and `c`; the
/// fourth corner is `b + c - a`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rectangle3 {
    a: Vector3,
    b: Vector3,
    c: Vector3,
}

impl Rectangle3 {
    /// Creates a rectangle from three corners.
    pub const fn new(a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self { a, b, c }
    }

    /// Shared corner.
    pub const fn a(&self) -> Vector3 {
        self.a
    }

    /// Corner along the first edge.
    pub const fn b(&self) -> Vector3 {
        self.b
    }

    /// Corner along the second edge.
    pub const fn c(&self) -> Vector3 {
        self.c
    }

    /// Replaces corner `a`.
    pub fn set_a(&mut self, a: Vector3) -> &mut Self {
        self.a = a;
        self
    }

    /// Replaces corner `b`.
    pub fn set_b(&mut self, b: Vector3) -> &mut Self {
        self.b = b;
        self
    }

    /// Replaces corner `c`.
    pub fn set_c(&mut self, c: Vector3) -> &mut Self {
        self.c = c;
        self
    }

    /// Copies `source`.
    pub fn set(&mut self, source: &Self) -> &mut Self {
        *self = *source;
        self
    }

    /// Corner opposite `a`.
    pub fn d(&self) -> Vector3 {
        self.b + self.c - self.a
    }

    /// Midpoint of the diagonals.
    pub fn center(&self) -> Vector3 {
        (self.b + self.c) * 0.5
    }

    /// Unit normal `(b - a) × (c - a)`; zero when degenerate.
    pub fn normal(&self) -> Vector3 {
        (self.b - self.a).cross(self.c - self.a).normalize()
    }

    /// Point at `a + s·(b - a) + t·(c - a)`; `s, t` in `[0, 1]` stay on the
    /// rectangle.
    pub fn point_at(&self, s: f64, t: f64) -> Vector3 {
        self.a + (self.b - self.a) * s + (self.c - self.a) * t
    }
}

warp_math::impl_poolable!(Rectangle3, new = Rectangle3::default());
