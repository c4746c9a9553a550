//! Capabilities the engine consumes but does not own.
//!
//! Handle ownership, time, value movement, penalty fees, pausing,
//! administration rights and event delivery all live outside the core. The
//! engine reaches them through these traits so hosts (and tests) can plug in
//! their own implementations.

use crate::events::StakingEvent;
use bucket_types::{Address, Amount, BlockHeight, BucketId};
use std::sync::Arc;
use thiserror::Error;

/// Source of the current logical time. Must never go backwards.
pub trait Clock: Send + Sync {
    fn now(&self) -> BlockHeight;
}

/// Tracks who holds each bucket handle.
pub trait BucketOwnership: Send + Sync {
    fn holder_of(&self, id: BucketId) -> Option<Address>;
    fn mint(&self, id: BucketId, holder: &Address);
    fn burn(&self, id: BucketId);
    fn transfer(&self, id: BucketId, to: &Address);
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Pays value out of the staking pool.
pub trait ValueTransfer: Send + Sync {
    fn pay(&self, recipient: &Address, amount: Amount) -> Result<(), TransferError>;
}

/// Penalty rate and the fees collected by emergency withdrawals.
pub trait FeeAccount: Send + Sync {
    /// Percentage, 0..=100.
    fn penalty_rate(&self) -> u8;
    fn set_penalty_rate(&self, rate: u8);
    fn accrue(&self, amount: Amount);
    fn accumulated(&self) -> Amount;
    /// Caller guarantees `amount <= accumulated()`.
    fn deduct(&self, amount: Amount);
}

pub trait PauseGate: Send + Sync {
    fn is_paused(&self) -> bool;
}

pub trait Authorizer: Send + Sync {
    fn is_admin(&self, caller: &Address) -> bool;
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: StakingEvent);
}

/// Everything the engine calls out to.
#[derive(Clone)]
pub struct Collaborators {
    pub clock: Arc<dyn Clock>,
    pub ownership: Arc<dyn BucketOwnership>,
    pub bank: Arc<dyn ValueTransfer>,
    pub fees: Arc<dyn FeeAccount>,
    pub pause: Arc<dyn PauseGate>,
    pub auth: Arc<dyn Authorizer>,
    pub events: Arc<dyn EventSink>,
}
