use bucket_types::BucketId;
use crate::StoreError;

/// Store trait for persisting staking engine state to durable storage.
///
/// Values are opaque `Vec<u8>` so this crate doesn't depend on
/// `bucket-engine`; the engine serializes its own snapshot types. Registry,
/// counters and fee state go through the meta keyspace; bucket records get a
/// keyspace of their own so they can be rewritten individually.
pub trait StakingStore {
    fn get_bucket(&self, id: BucketId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_bucket(&self, id: BucketId, record: &[u8]) -> Result<(), StoreError>;
    fn delete_bucket(&self, id: BucketId) -> Result<(), StoreError>;
    fn iter_buckets(&self) -> Result<Vec<(BucketId, Vec<u8>)>, StoreError>;
    fn clear_buckets(&self) -> Result<(), StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
