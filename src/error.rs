//! Error types for building interpolators.

use thiserror::Error;

/// Why two values could not be paired into an interpolator.
///
/// `path` points at the offending node using a JSON-path-like notation
/// (`$`, `$.series[2].color`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolateError {
    /// The two sides have different shapes (e.g. a number and a string, or an
    /// array and an object).
    #[error("cannot interpolate values of different type at {path}: {from} -> {to}")]
    TypeMismatch {
        path: String,
        from: &'static str,
        to: &'static str,
    },
    /// One side of an object pairing is `null`.
    #[error("object cannot be null at {path}")]
    NullObject { path: String },
}

impl InterpolateError {
    /// Location of the offending node.
    pub fn path(&self) -> &str {
        match self {
            InterpolateError::TypeMismatch { path, .. } | InterpolateError::NullObject { path } => {
                path
            }
        }
    }
}
