use bucket_types::{Amount, BucketId, BucketState, Duration, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket {0} not found")]
    UnknownBucket(BucketId),

    #[error("bucket {id} is {state}")]
    WrongState { id: BucketId, state: BucketState },

    #[error("({amount}, {duration}) is not a registered bucket type")]
    UnregisteredType { amount: Amount, duration: Duration },

    #[error("bucket id space exhausted")]
    IdExhausted,

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownBucket(_) | Self::NotFound(_) => ErrorKind::NotFound,
            Self::WrongState { .. } => ErrorKind::State,
            Self::Backend(_) => ErrorKind::Collaborator,
            Self::UnregisteredType { .. }
            | Self::IdExhausted
            | Self::Serialization(_)
            | Self::Corruption(_) => ErrorKind::Internal,
        }
    }
}
