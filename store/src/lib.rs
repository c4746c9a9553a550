//! Bucket storage.
//!
//! [`BucketStore`] owns the live bucket records together with the vote tally
//! and keeps the two consistent: every state-affecting mutation updates the
//! tally in the same call. It performs no policy checks of its own beyond the
//! structural ones (bucket exists, bucket is in the expected state, its
//! `(amount, duration)` is a registered type); those belong to the engine.
//!
//! [`StakingStore`] is the abstract persistence backend. Any durable store
//! (LMDB, RocksDB, in-memory for testing) implements it; the rest of the
//! workspace depends only on the trait.

pub mod bucket;
pub mod bucket_store;
pub mod error;
pub mod staking;

pub use bucket::Bucket;
pub use bucket_store::BucketStore;
pub use error::StoreError;
pub use staking::StakingStore;
