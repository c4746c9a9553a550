//! Bucket-type registry.
//!
//! A bucket type is a registered `(amount, duration)` pair. Buckets may only
//! be created or re-committed against an active type. Types are never removed;
//! each one keeps a stable index (used as the column key of the vote tally)
//! and an append-only history of the periods during which it was active.
//!
//! Deactivating a type does not touch existing buckets. Only new commitments
//! (stake, expand, merge, re-lock with a changed duration) check activity.

pub mod bucket_type;
pub mod error;
pub mod registry;

pub use bucket_type::{ActivationPeriod, BucketType, TypeIndex};
pub use error::RegistryError;
pub use registry::BucketTypeRegistry;
