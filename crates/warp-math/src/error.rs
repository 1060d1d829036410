// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use thiserror::Error;

/// Result alias used by fallible math operations.
pub type Result<T> = core::result::Result<T, MathError>;

/// Failures surfaced by math operations.
///
/// Every variant describes a caller-contract violation; nothing is retried
/// or clamped internally. A mutator that returns an error leaves its receiver
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// A required argument had an unusable value (e.g. a zero scale).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A component, row or column index fell outside `0..len`.
    #[error("index {index} out of range (expected 0..{len})")]
    IndexOutOfRange {
        /// Index supplied by the caller.
        index: usize,
        /// Number of addressable slots.
        len: usize,
    },
    /// Inversion was requested on a matrix whose determinant is effectively zero.
    #[error("matrix cannot be inverted (determinant {determinant:e})")]
    SingularMatrix {
        /// Determinant computed for the rejected matrix.
        determinant: f64,
    },
    /// The operation conflicts with the receiver's current representation.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),
    /// A validated value would contain NaN or infinite components.
    #[error("invalid numeric state: {0}")]
    InvalidNumericState(&'static str),
    /// A binary read ran out of input.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes required to decode the value.
        needed: usize,
        /// Bytes that were available.
        remaining: usize,
    },
}

/// Checks `index < len`, reporting [`MathError::IndexOutOfRange`] otherwise.
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(MathError::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn index_check_reports_bounds() {
        assert!(check_index(2, 3).is_ok());
        assert_eq!(
            check_index(3, 3),
            Err(MathError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn messages_name_the_failure() {
        let err = MathError::SingularMatrix { determinant: 0.0 };
        assert!(err.to_string().starts_with("matrix cannot be inverted"));
        let err = MathError::IllegalState("scale is already provided by the 3x3 matrix");
        assert_eq!(
            err.to_string(),
            "illegal state: scale is already provided by the 3x3 matrix"
        );
    }
}
