//! Error taxonomy shared across crates.
//!
//! Each crate has its own error enum; all of them classify into one
//! [`ErrorKind`] so callers can branch on the category without matching
//! every variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller is not the bucket holder or not a registry admin.
    Authorization,
    /// Unknown bucket, unknown bucket type, or out-of-range query.
    NotFound,
    /// Bucket is in the wrong lifecycle state for the operation.
    State,
    /// Malformed parameters: amounts, durations, batch shape.
    Validation,
    /// A holding period or withdrawal delay has not elapsed yet.
    Timing,
    /// Rejected by policy: inactive bucket type or paused system.
    Policy,
    /// An external capability (payout, storage backend) failed.
    Collaborator,
    /// A broken internal invariant.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::State => "state",
            Self::Validation => "validation",
            Self::Timing => "timing",
            Self::Policy => "policy",
            Self::Collaborator => "collaborator",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
