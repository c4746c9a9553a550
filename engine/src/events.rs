use bucket_registry::TypeIndex;
use bucket_types::{Address, Amount, BucketId, DelegateId, Duration};
use serde::{Deserialize, Serialize};

/// Emitted once per committed call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StakingEvent {
    Staked {
        id: BucketId,
        holder: Address,
        delegate: DelegateId,
        amount: Amount,
        duration: Duration,
    },
    Locked {
        id: BucketId,
        duration: Duration,
    },
    Unlocked {
        id: BucketId,
    },
    Unstaked {
        id: BucketId,
    },
    /// `penalty` is zero for a regular withdrawal.
    Withdrawal {
        id: BucketId,
        recipient: Address,
        amount: Amount,
        penalty: Amount,
    },
    BucketExpanded {
        id: BucketId,
        amount: Amount,
        duration: Duration,
    },
    DelegateChanged {
        id: BucketId,
        from: DelegateId,
        to: DelegateId,
    },
    Merged {
        survivor: BucketId,
        consumed: Vec<BucketId>,
        amount: Amount,
        duration: Duration,
    },
    BucketTypeActivated {
        index: TypeIndex,
        amount: Amount,
        duration: Duration,
    },
    BucketTypeDeactivated {
        index: TypeIndex,
        amount: Amount,
        duration: Duration,
    },
    PenaltyRateChanged {
        from: u8,
        to: u8,
    },
    FeeWithdrawal {
        recipient: Address,
        amount: Amount,
    },
    Transferred {
        id: BucketId,
        from: Address,
        to: Address,
    },
}

impl StakingEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Staked { .. } => "staked",
            Self::Locked { .. } => "locked",
            Self::Unlocked { .. } => "unlocked",
            Self::Unstaked { .. } => "unstaked",
            Self::Withdrawal { .. } => "withdrawal",
            Self::BucketExpanded { .. } => "bucket_expanded",
            Self::DelegateChanged { .. } => "delegate_changed",
            Self::Merged { .. } => "merged",
            Self::BucketTypeActivated { .. } => "bucket_type_activated",
            Self::BucketTypeDeactivated { .. } => "bucket_type_deactivated",
            Self::PenaltyRateChanged { .. } => "penalty_rate_changed",
            Self::FeeWithdrawal { .. } => "fee_withdrawal",
            Self::Transferred { .. } => "transferred",
        }
    }
}
