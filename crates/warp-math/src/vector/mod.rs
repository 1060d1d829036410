// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Fixed-size double-precision vectors.
//!
//! The three types share one component-wise algebra generated by
//! `vector_common!`; dimension-specific operations (cross product, planar
//! rotation) live beside each type. Value-returning methods consume `self`
//! (all vectors are `Copy`); the `*_local` variants overwrite the receiver and
//! return it for chaining.

macro_rules! vector_common {
    ($name:ident, $len:literal, $(($f:ident, $set:ident)),+) => {
        impl $name {
            /// Number of components.
            pub const LEN: usize = $len;

            /// Creates a vector from components.
            pub const fn new($($f: f64),+) -> Self {
                Self { $($f),+ }
            }

            /// Vector with every component equal to `value`.
            pub const fn splat(value: f64) -> Self {
                Self { $($f: value),+ }
            }

            $(
                /// Component accessor.
                pub const fn $f(&self) -> f64 {
                    self.$f
                }

                /// Overwrites a single component.
                pub fn $set(&mut self, value: f64) -> &mut Self {
                    self.$f = value;
                    self
                }
            )+

            /// Components in declaration order.
            pub const fn to_array(self) -> [f64; $len] {
                [$(self.$f),+]
            }

            /// Components narrowed to `f32`, e.g. for vertex buffers.
            #[allow(clippy::cast_possible_truncation)]
            pub fn to_f32_array(self) -> [f32; $len] {
                [$(self.$f as f32),+]
            }

            /// Component at `index`.
            pub fn get(&self, index: usize) -> $crate::Result<f64> {
                $crate::error::check_index(index, $len)?;
                Ok(self.to_array()[index])
            }

            /// Overwrites the component at `index`.
            pub fn set_value(&mut self, index: usize, value: f64) -> $crate::Result<&mut Self> {
                $crate::error::check_index(index, $len)?;
                let mut values = self.to_array();
                values[index] = value;
                *self = Self::from(values);
                Ok(self)
            }

            /// Sets every component to zero.
            pub fn zero(&mut self) -> &mut Self {
                *self = Self::ZERO;
                self
            }

            /// Adds `other` in place.
            pub fn add_local(&mut self, other: Self) -> &mut Self {
                $(self.$f += other.$f;)+
                self
            }

            /// Subtracts `other` in place.
            pub fn subtract_local(&mut self, other: Self) -> &mut Self {
                $(self.$f -= other.$f;)+
                self
            }

            /// Multiplies every component by `scalar` in place.
            pub fn multiply_local(&mut self, scalar: f64) -> &mut Self {
                $(self.$f *= scalar;)+
                self
            }

            /// Component-wise product.
            pub fn multiply_components(self, other: Self) -> Self {
                Self { $($f: self.$f * other.$f),+ }
            }

            /// Component-wise product in place.
            pub fn multiply_components_local(&mut self, other: Self) -> &mut Self {
                $(self.$f *= other.$f;)+
                self
            }

            /// Divides every component by `scalar` in place.
            pub fn divide_local(&mut self, scalar: f64) -> &mut Self {
                $(self.$f /= scalar;)+
                self
            }

            /// Component-wise quotient.
            pub fn divide_components(self, other: Self) -> Self {
                Self { $($f: self.$f / other.$f),+ }
            }

            /// Component-wise quotient in place.
            pub fn divide_components_local(&mut self, other: Self) -> &mut Self {
                $(self.$f /= other.$f;)+
                self
            }

            /// `self * scale + add`.
            pub fn scale_add(self, scale: f64, add: Self) -> Self {
                Self { $($f: self.$f * scale + add.$f),+ }
            }

            /// `self * scale + add`, in place.
            pub fn scale_add_local(&mut self, scale: f64, add: Self) -> &mut Self {
                *self = self.scale_add(scale, add);
                self
            }

            /// Negates every component in place.
            pub fn negate_local(&mut self) -> &mut Self {
                $(self.$f = -self.$f;)+
                self
            }

            /// Dot product.
            pub fn dot(self, other: Self) -> f64 {
                0.0 $(+ self.$f * other.$f)+
            }

            /// Squared magnitude.
            pub fn length_squared(self) -> f64 {
                self.dot(self)
            }

            /// Magnitude.
            pub fn length(self) -> f64 {
                self.length_squared().sqrt()
            }

            /// Squared distance to `other`.
            pub fn distance_squared(self, other: Self) -> f64 {
                (self - other).length_squared()
            }

            /// Distance to `other`.
            pub fn distance(self, other: Self) -> f64 {
                self.distance_squared(other).sqrt()
            }

            /// Unit-length copy; vectors with squared length ≤ `EPSILON`
            /// normalize to zero.
            pub fn normalize(self) -> Self {
                let len_sq = self.length_squared();
                if len_sq.abs() > $crate::util::EPSILON {
                    self * (1.0 / len_sq.sqrt())
                } else {
                    Self::ZERO
                }
            }

            /// Normalizes in place; degenerate vectors are left untouched.
            pub fn normalize_local(&mut self) -> &mut Self {
                let len_sq = self.length_squared();
                if len_sq.abs() > $crate::util::EPSILON {
                    self.multiply_local(1.0 / len_sq.sqrt());
                }
                self
            }

            /// Linear interpolation from `self` (`t = 0`) to `end` (`t = 1`).
            pub fn lerp(self, end: Self, t: f64) -> Self {
                if self == end {
                    return self;
                }
                Self { $($f: (1.0 - t) * self.$f + t * end.$f),+ }
            }

            /// Linear interpolation toward `end`, in place.
            pub fn lerp_local(&mut self, end: Self, t: f64) -> &mut Self {
                *self = self.lerp(end, t);
                self
            }

            /// Smallest angle in radians between two unit vectors.
            pub fn smallest_angle_between(self, other: Self) -> f64 {
                $crate::util::acos_clamped(self.dot(other))
            }

            /// `true` when no component is NaN or infinite.
            pub fn is_finite(self) -> bool {
                true $(&& self.$f.is_finite())+
            }

            /// `true` when any component is infinite.
            pub fn is_infinite(self) -> bool {
                false $(|| self.$f.is_infinite())+
            }

            /// Component-wise comparison within `tolerance`.
            pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
                true $(&& (self.$f - other.$f).abs() <= tolerance)+
            }
        }

        impl From<[f64; $len]> for $name {
            fn from(value: [f64; $len]) -> Self {
                let [$($f),+] = value;
                Self { $($f),+ }
            }
        }

        impl From<$name> for [f64; $len] {
            fn from(value: $name) -> Self {
                value.to_array()
            }
        }

        impl ::core::ops::Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($f: self.$f + rhs.$f),+ }
            }
        }

        impl ::core::ops::Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($f: self.$f - rhs.$f),+ }
            }
        }

        impl ::core::ops::Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self { $($f: self.$f * rhs),+ }
            }
        }

        impl ::core::ops::Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                rhs * self
            }
        }

        impl ::core::ops::Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self { $($f: self.$f / rhs),+ }
            }
        }

        impl ::core::ops::Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($f: -self.$f),+ }
            }
        }

        impl ::core::ops::AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.add_local(rhs);
            }
        }

        impl ::core::ops::SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                self.subtract_local(rhs);
            }
        }

        impl ::core::ops::MulAssign<f64> for $name {
            fn mul_assign(&mut self, rhs: f64) {
                self.multiply_local(rhs);
            }
        }

        impl ::core::ops::DivAssign<f64> for $name {
            fn div_assign(&mut self, rhs: f64) {
                self.divide_local(rhs);
            }
        }

        $crate::impl_poolable!($name, new = $name::ZERO);
    };
}

mod vec2;
mod vec3;
mod vec4;

pub use vec2::Vector2;
pub use vec3::Vector3;
pub use vec4::Vector4;
