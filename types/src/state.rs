//! Lifecycle states of a bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two states in which a bucket contributes to a delegate's votes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    Locked,
    Unlocked,
}

/// The derived lifecycle state of a live bucket.
///
/// `Locked ⇄ Unlocked → Unstaked → (removed)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketState {
    /// Committed for its full duration; the unlock clock has not started.
    Locked,
    /// Counting down its duration; may be re-locked.
    Unlocked,
    /// Exited the voting pool; waiting out the withdrawal delay.
    Unstaked,
}

impl BucketState {
    /// The tally column this state counts in, if any.
    pub fn lock_state(&self) -> Option<LockState> {
        match self {
            Self::Locked => Some(LockState::Locked),
            Self::Unlocked => Some(LockState::Unlocked),
            Self::Unstaked => None,
        }
    }

    /// Locked or Unlocked.
    pub fn is_staked(&self) -> bool {
        !matches!(self, Self::Unstaked)
    }
}

impl fmt::Display for BucketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Unstaked => "unstaked",
        };
        f.write_str(s)
    }
}
