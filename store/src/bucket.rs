//! A single stake position.

use bucket_types::{Amount, BlockHeight, BucketId, BucketState, DelegateId, Duration};
use serde::{Deserialize, Serialize};

/// A bucket record.
///
/// `unlocked_at` and `unstaked_at` are `None` until the bucket is unlocked or
/// unstaked; the lifecycle state is derived from them, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: BucketId,
    pub amount: Amount,
    pub duration: Duration,
    pub delegate: DelegateId,
    pub unlocked_at: Option<BlockHeight>,
    pub unstaked_at: Option<BlockHeight>,
}

impl Bucket {
    /// A freshly staked, locked bucket.
    pub fn locked(id: BucketId, amount: Amount, duration: Duration, delegate: DelegateId) -> Self {
        Self {
            id,
            amount,
            duration,
            delegate,
            unlocked_at: None,
            unstaked_at: None,
        }
    }

    pub fn state(&self) -> BucketState {
        match (self.unlocked_at, self.unstaked_at) {
            (_, Some(_)) => BucketState::Unstaked,
            (Some(_), None) => BucketState::Unlocked,
            (None, None) => BucketState::Locked,
        }
    }

    /// Height from which an unlocked bucket may be unstaked.
    pub fn unstake_ready_at(&self) -> Option<BlockHeight> {
        self.unlocked_at.map(|at| at.after(self.duration))
    }

    /// Height from which an unstaked bucket may be withdrawn.
    pub fn withdraw_ready_at(&self, withdrawal_delay: Duration) -> Option<BlockHeight> {
        self.unstaked_at.map(|at| at.after(withdrawal_delay))
    }
}
