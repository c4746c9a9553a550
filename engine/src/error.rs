//! Lifecycle errors.

use crate::collaborators::TransferError;
use bucket_registry::RegistryError;
use bucket_store::StoreError;
use bucket_types::{Address, Amount, BlockHeight, BucketId, DelegateId, Duration, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StakingError {
    #[error("{caller} is not the holder of bucket {id}")]
    NotHolder { id: BucketId, caller: Address },

    #[error("{0} is not authorized for administration")]
    Unauthorized(Address),

    #[error("bucket {0} not found")]
    UnknownBucket(BucketId),

    #[error("bucket {0} is not locked")]
    NotLockedBucket(BucketId),

    #[error("bucket {0} is not unlocked")]
    NotUnlockedBucket(BucketId),

    #[error("bucket {0} is not unstaked")]
    NotUnstakedBucket(BucketId),

    #[error("bucket {0} is no longer staked")]
    NotStakedBucket(BucketId),

    #[error("bucket {0} appears more than once")]
    DuplicateBucket(BucketId),

    #[error("bucket list is empty")]
    EmptyList,

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("amount {requested} is smaller than current {current}")]
    InvalidAmount { current: Amount, requested: Amount },

    #[error("duration {requested} is shorter than current {current}")]
    InvalidDuration { current: Duration, requested: Duration },

    #[error("payment mismatch: expected {expected}, paid {paid}")]
    InsufficientPayment { expected: Amount, paid: Amount },

    #[error("({amount}, {duration}) is not a bucket type")]
    InvalidBucketType { amount: Amount, duration: Duration },

    #[error("bucket type ({amount}, {duration}) is not active")]
    InactiveBucketType { amount: Amount, duration: Duration },

    #[error("bucket {id} already delegates to {delegate}")]
    SameDelegate { id: BucketId, delegate: DelegateId },

    #[error("bucket {id} cannot be unstaked before {ready_at}")]
    NotReadyToUnstake { id: BucketId, ready_at: BlockHeight },

    #[error("bucket {id} cannot be withdrawn before {ready_at}")]
    NotReadyToWithdraw { id: BucketId, ready_at: BlockHeight },

    #[error("penalty rate {0} exceeds 100")]
    InvalidPenaltyRate(u8),

    #[error("requested {requested} exceeds accumulated fees {available}")]
    InsufficientFees { requested: Amount, available: Amount },

    #[error("staking is paused")]
    Paused,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("value transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StakingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotHolder { .. } | Self::Unauthorized(_) => ErrorKind::Authorization,
            Self::UnknownBucket(_) => ErrorKind::NotFound,
            Self::NotLockedBucket(_)
            | Self::NotUnlockedBucket(_)
            | Self::NotUnstakedBucket(_)
            | Self::NotStakedBucket(_) => ErrorKind::State,
            Self::NotReadyToUnstake { .. } | Self::NotReadyToWithdraw { .. } => ErrorKind::Timing,
            Self::InactiveBucketType { .. } | Self::Paused => ErrorKind::Policy,
            Self::DuplicateBucket(_)
            | Self::EmptyList
            | Self::InvalidParameters(_)
            | Self::InvalidAmount { .. }
            | Self::InvalidDuration { .. }
            | Self::InsufficientPayment { .. }
            | Self::InvalidBucketType { .. }
            | Self::SameDelegate { .. }
            | Self::InvalidPenaltyRate(_)
            | Self::InsufficientFees { .. }
            | Self::Overflow
            | Self::Config(_) => ErrorKind::Validation,
            Self::Transfer(_) => ErrorKind::Collaborator,
            Self::Serialization(_) => ErrorKind::Internal,
            Self::Registry(e) => e.kind(),
            Self::Store(e) => e.kind(),
        }
    }
}
