//! Registry-specific errors.

use bucket_types::{Amount, Duration, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate bucket type ({amount}, {duration})")]
    DuplicateType { amount: Amount, duration: Duration },

    #[error("amount {0} is below the minimum bucket amount")]
    InvalidAmount(Amount),

    #[error("duration {0} is outside the allowed bucket durations")]
    InvalidDuration(Duration),

    #[error("unknown bucket type ({amount}, {duration})")]
    UnknownType { amount: Amount, duration: Duration },

    #[error("bucket type ({amount}, {duration}) is not active")]
    InactiveType { amount: Amount, duration: Duration },

    #[error("bucket type ({amount}, {duration}) is already {}", state_word(.active))]
    AlreadyInState {
        amount: Amount,
        duration: Duration,
        active: bool,
    },

    #[error("offset {offset} out of range for {count} bucket types")]
    InvalidRange { offset: usize, count: usize },
}

fn state_word(active: &bool) -> &'static str {
    if *active {
        "active"
    } else {
        "inactive"
    }
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateType { .. }
            | Self::InvalidAmount(_)
            | Self::InvalidDuration(_)
            | Self::AlreadyInState { .. } => ErrorKind::Validation,
            Self::UnknownType { .. } | Self::InvalidRange { .. } => ErrorKind::NotFound,
            Self::InactiveType { .. } => ErrorKind::Policy,
        }
    }
}
