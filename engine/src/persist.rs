//! Snapshot persistence through [`StakingStore`].
//!
//! A snapshot is a header in the meta keyspace (generation, id counter,
//! registry) plus one record per live bucket. The tally is never written; it
//! is rebuilt from the buckets.
//!
//! A save writes the bucket records, then deletes stale ones, then writes the
//! header. The header is the commit point. Every record carries the
//! generation of the save that wrote it, so a save interrupted part way is
//! reported as corruption on load instead of yielding a partial state.

use crate::collaborators::Collaborators;
use crate::config::StakingConfig;
use crate::engine::LifecycleEngine;
use crate::error::StakingError;
use bucket_registry::{BucketType, BucketTypeRegistry};
use bucket_store::{Bucket, BucketStore, StakingStore, StoreError};
use bucket_types::BucketId;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const META_SNAPSHOT: &[u8] = b"snapshot";

#[derive(Serialize, Deserialize)]
struct SnapshotHeader {
    generation: u64,
    next_id: BucketId,
    bucket_types: Vec<BucketType>,
}

#[derive(Serialize, Deserialize)]
struct StoredBucket<B> {
    generation: u64,
    bucket: B,
}

fn serialization(e: bincode::Error) -> StakingError {
    StakingError::Serialization(e.to_string())
}

fn read_header(store: &dyn StakingStore) -> Result<Option<SnapshotHeader>, StakingError> {
    match store.get_meta(META_SNAPSHOT)? {
        Some(bytes) => Ok(Some(bincode::deserialize(&bytes).map_err(serialization)?)),
        None => Ok(None),
    }
}

impl LifecycleEngine {
    /// Persist the registry, every live bucket and the id counter.
    ///
    /// On error the store may hold a mix of old and new records; the next
    /// successful save repairs it, and until then loading fails.
    pub fn save_to_store(&self, store: &dyn StakingStore) -> Result<(), StakingError> {
        let generation = match read_header(store) {
            Ok(header) => header.map_or(1, |h| h.generation.wrapping_add(1)),
            Err(e) => {
                warn!(error = %e, "unreadable snapshot header, starting a new generation");
                1
            }
        };

        for bucket in self.store.iter() {
            let record = StoredBucket { generation, bucket };
            let bytes = bincode::serialize(&record).map_err(serialization)?;
            store.put_bucket(bucket.id, &bytes)?;
        }
        for (id, _) in store.iter_buckets()? {
            if !self.store.contains(id) {
                store.delete_bucket(id)?;
            }
        }

        let header = SnapshotHeader {
            generation,
            next_id: self.store.next_id(),
            bucket_types: self.registry.types().to_vec(),
        };
        let bytes = bincode::serialize(&header).map_err(serialization)?;
        store.put_meta(META_SNAPSHOT, &bytes)?;

        info!(
            generation,
            buckets = self.store.len(),
            bucket_types = self.registry.count(),
            next_id = %self.store.next_id(),
            "staking state saved"
        );
        Ok(())
    }

    /// Restore an engine from a store written by [`Self::save_to_store`].
    ///
    /// An empty store yields an empty engine. The fee account and holder
    /// records belong to the collaborators and are left as they are.
    pub fn load_from_store(
        config: StakingConfig,
        deps: Collaborators,
        store: &dyn StakingStore,
    ) -> Result<Self, StakingError> {
        config.validate()?;

        let records = store.iter_buckets()?;
        let header = match read_header(store)? {
            Some(header) => header,
            None if records.is_empty() => SnapshotHeader {
                generation: 0,
                next_id: BucketId::FIRST,
                bucket_types: Vec::new(),
            },
            None => {
                return Err(StoreError::Corruption(format!(
                    "{} bucket records without a snapshot header",
                    records.len()
                ))
                .into())
            }
        };
        let registry = BucketTypeRegistry::from_types(config.type_policy(), header.bucket_types)?;

        let mut buckets = Vec::with_capacity(records.len());
        for (id, bytes) in records {
            let record: StoredBucket<Bucket> =
                bincode::deserialize(&bytes).map_err(serialization)?;
            if record.generation != header.generation {
                return Err(StoreError::Corruption(format!(
                    "bucket {id} belongs to generation {}, snapshot is generation {}",
                    record.generation, header.generation
                ))
                .into());
            }
            if record.bucket.id != id {
                return Err(StoreError::Corruption(format!(
                    "bucket stored under {id} carries id {}",
                    record.bucket.id
                ))
                .into());
            }
            buckets.push(record.bucket);
        }
        let bucket_store = BucketStore::restore(&registry, buckets, header.next_id)?;

        info!(
            generation = header.generation,
            buckets = bucket_store.len(),
            bucket_types = registry.count(),
            next_id = %header.next_id,
            "staking state loaded"
        );
        Ok(Self {
            config,
            registry,
            store: bucket_store,
            deps,
        })
    }
}
