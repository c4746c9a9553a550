//! Delegate vote tally.
//!
//! Counts live buckets per `(delegate, bucket-type index, lock state)`. The
//! tally is maintained incrementally by the bucket store on every mutation and
//! rebuilt from the bucket set only on startup, so queries never scan buckets.

pub mod tally;

pub use tally::{TallyRow, VoteTally};
