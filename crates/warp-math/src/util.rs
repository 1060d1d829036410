// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::f64::consts::PI;

/// Machine epsilon for `f64`; determinants at or below this are singular.
pub const EPSILON: f64 = f64::EPSILON;

/// Tolerance used by orthonormality checks.
pub const ZERO_TOLERANCE: f64 = 0.0001;

/// Component-wise deviance accepted by approximate equality checks.
pub const ALLOWED_DEVIANCE: f64 = 0.00000001;

/// π / 2.
pub const HALF_PI: f64 = 0.5 * PI;

/// Multiply degrees by this to obtain radians.
pub const DEG_TO_RAD: f64 = PI / 180.0;

/// Multiply radians by this to obtain degrees.
pub const RAD_TO_DEG: f64 = 180.0 / PI;

/// Linear interpolation between `start` and `end` by `percent`.
///
/// Exact endpoints are returned for `percent == 0` and `percent == 1` and
/// when both ends are equal.
pub fn lerp(percent: f64, start: f64, end: f64) -> f64 {
    if start == end || percent == 0.0 {
        start
    } else if percent == 1.0 {
        end
    } else {
        (1.0 - percent) * start + percent * end
    }
}

/// Clamps `value` to `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// `acos` with its argument clamped to `[-1, 1]`.
///
/// Dot products of unit vectors drift slightly outside the domain under
/// rounding; clamping keeps the result finite.
pub fn acos_clamped(value: f64) -> f64 {
    clamp(value, -1.0, 1.0).acos()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints_exactly() {
        assert_eq!(lerp(0.0, 3.0, 7.0), 3.0);
        assert_eq!(lerp(1.0, 3.0, 7.0), 7.0);
        assert!((lerp(0.25, 0.0, 8.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn acos_clamped_tolerates_drift() {
        assert_eq!(acos_clamped(1.0000000001), 0.0);
        assert!((acos_clamped(-1.0000001) - PI).abs() < 1e-12);
    }
}
