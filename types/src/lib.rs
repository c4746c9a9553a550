//! Fundamental types for bucket staking.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! amounts, logical time, bucket and delegate identifiers, lock states, the
//! bucket-type policy bounds and the error taxonomy.

pub mod address;
pub mod amount;
pub mod error;
pub mod id;
pub mod params;
pub mod state;
pub mod time;

pub use address::{Address, DelegateId, DelegateIdError};
pub use amount::Amount;
pub use error::ErrorKind;
pub use id::BucketId;
pub use params::TypePolicy;
pub use state::{BucketState, LockState};
pub use time::{BlockHeight, Duration};
