//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Every capability the staking engine consumes (clock, handle ownership,
//! payouts, fees, pausing, admin rights, events, storage) is abstracted behind
//! a trait. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: build a [`NullEnvironment`] and hand its
//! [`collaborators`](NullEnvironment::collaborators) to the engine.

pub mod bank;
pub mod clock;
pub mod env;
pub mod events;
pub mod fees;
pub mod gate;
pub mod ownership;
pub mod store;

pub use bank::NullBank;
pub use clock::NullClock;
pub use env::NullEnvironment;
pub use events::NullEventSink;
pub use fees::NullFeeAccount;
pub use gate::{NullAuthorizer, NullPauseGate};
pub use ownership::NullOwnership;
pub use store::NullStakingStore;
