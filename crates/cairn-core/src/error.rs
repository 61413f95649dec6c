//! Error types for envelope construction.

use std::fmt;

/// Errors arising from [`Envelope`](crate::Envelope) construction.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    /// An ordinate is NaN or infinite.
    NonFinite {
        /// Name of the offending ordinate (`"x_min"`, `"y_max"`, ...).
        ordinate: &'static str,
        /// The non-finite value.
        value: f64,
    },
    /// The minimum exceeds the maximum on one axis.
    Inverted {
        /// The axis on which min > max (`"x"` or `"y"`).
        axis: &'static str,
        /// The minimum ordinate.
        min: f64,
        /// The maximum ordinate.
        max: f64,
    },
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { ordinate, value } => {
                write!(f, "envelope ordinate {ordinate} is not finite: {value}")
            }
            Self::Inverted { axis, min, max } => {
                write!(f, "envelope {axis}-axis inverted: min {min} > max {max}")
            }
        }
    }
}

impl std::error::Error for EnvelopeError {}
