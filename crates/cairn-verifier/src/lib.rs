//! The rule seam of the Cairn verification framework.
//!
//! A [`Verifier`] is one data-quality rule: it judges rows one at a time
//! as the driver streams tiles, defers the inconclusive ones through the
//! pending-feature cache, and produces the user-visible diagnostics once
//! a deferred judgment becomes final. Spatial predicates stay behind the
//! [`PartnerProbe`] seam — rules consume the external geometry engine's
//! answers, they never implement geometry themselves.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod probe;
pub mod verifier;

pub use error::VerifierError;
pub use probe::{PartnerProbe, PartnerSet};
pub use verifier::{RowVerdict, Verifier};
