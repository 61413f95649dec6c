//! Error types for rule evaluation.

use cairn_core::TableSlot;
use std::fmt;

/// Errors from individual rule evaluation.
///
/// Returned by [`Verifier::evaluate`](crate::Verifier::evaluate) and
/// wrapped by the tile driver's run error.
#[derive(Clone, Debug, PartialEq)]
pub enum VerifierError {
    /// The rule's evaluation failed.
    EvaluationFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The rule was handed a row from a slot it does not participate in.
    UnsupportedSlot {
        /// The offending slot.
        slot: TableSlot,
    },
    /// A rule parameter is out of range at construction time.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for VerifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EvaluationFailed { reason } => write!(f, "evaluation failed: {reason}"),
            Self::UnsupportedSlot { slot } => {
                write!(f, "rule does not participate in table slot {slot}")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid rule parameter {name}: {value}")
            }
        }
    }
}

impl std::error::Error for VerifierError {}
