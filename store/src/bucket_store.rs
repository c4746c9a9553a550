//! Live bucket records plus the vote tally they feed.

use crate::bucket::Bucket;
use crate::error::StoreError;
use bucket_registry::{BucketTypeRegistry, TypeIndex};
use bucket_tally::VoteTally;
use bucket_types::{Amount, BlockHeight, BucketId, BucketState, DelegateId, Duration, LockState};
use std::collections::{BTreeMap, HashSet};

/// Owns every live bucket and the tally derived from them.
///
/// Each mutating method resolves everything that can fail before it touches
/// either map, so an `Err` always leaves the store unchanged.
#[derive(Clone, Debug)]
pub struct BucketStore {
    buckets: BTreeMap<BucketId, Bucket>,
    tally: VoteTally,
    next_id: BucketId,
}

impl BucketStore {
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            tally: VoteTally::new(),
            next_id: BucketId::FIRST,
        }
    }

    /// Rebuild a store from persisted records; the tally is recomputed.
    pub fn restore(
        registry: &BucketTypeRegistry,
        buckets: Vec<Bucket>,
        next_id: BucketId,
    ) -> Result<Self, StoreError> {
        let mut map = BTreeMap::new();
        for bucket in buckets {
            if bucket.id >= next_id {
                return Err(StoreError::Corruption(format!(
                    "bucket {} at or beyond next id {}",
                    bucket.id, next_id
                )));
            }
            if map.insert(bucket.id, bucket).is_some() {
                return Err(StoreError::Corruption("duplicate bucket id".to_string()));
            }
        }
        let mut slots = Vec::new();
        for bucket in map.values() {
            if let Some((index, state)) = Self::slot(registry, bucket)? {
                slots.push((bucket.delegate, index, state));
            }
        }
        let mut tally = VoteTally::new();
        tally.rebuild(slots.into_iter());
        Ok(Self {
            buckets: map,
            tally,
            next_id,
        })
    }

    pub fn get(&self, id: BucketId) -> Option<&Bucket> {
        self.buckets.get(&id)
    }

    pub fn require(&self, id: BucketId) -> Result<&Bucket, StoreError> {
        self.buckets.get(&id).ok_or(StoreError::UnknownBucket(id))
    }

    pub fn contains(&self, id: BucketId) -> bool {
        self.buckets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.values()
    }

    pub fn tally(&self) -> &VoteTally {
        &self.tally
    }

    /// The id the next created bucket will get.
    pub fn next_id(&self) -> BucketId {
        self.next_id
    }

    /// Insert a new locked bucket and count it.
    pub fn create(
        &mut self,
        registry: &BucketTypeRegistry,
        amount: Amount,
        duration: Duration,
        delegate: DelegateId,
    ) -> Result<BucketId, StoreError> {
        let index = Self::type_index(registry, amount, duration)?;
        let id = self.next_id;
        let next = id.next().ok_or(StoreError::IdExhausted)?;

        self.buckets
            .insert(id, Bucket::locked(id, amount, duration, delegate));
        self.tally.increment(&delegate, index, LockState::Locked);
        self.next_id = next;
        Ok(id)
    }

    /// Locked → Unlocked at `now`.
    pub fn unlock(
        &mut self,
        registry: &BucketTypeRegistry,
        id: BucketId,
        now: BlockHeight,
    ) -> Result<(), StoreError> {
        let bucket = self.expect_state(id, BucketState::Locked)?;
        let index = Self::type_index(registry, bucket.amount, bucket.duration)?;
        let delegate = bucket.delegate;

        self.tally
            .shift(&delegate, (index, LockState::Locked), (index, LockState::Unlocked));
        self.bucket_mut(id)?.unlocked_at = Some(now);
        Ok(())
    }

    /// Unlocked → Locked with a (possibly longer) duration.
    pub fn relock(
        &mut self,
        registry: &BucketTypeRegistry,
        id: BucketId,
        duration: Duration,
    ) -> Result<(), StoreError> {
        let bucket = self.expect_state(id, BucketState::Unlocked)?;
        let from = Self::type_index(registry, bucket.amount, bucket.duration)?;
        let to = Self::type_index(registry, bucket.amount, duration)?;
        let delegate = bucket.delegate;

        self.tally
            .shift(&delegate, (from, LockState::Unlocked), (to, LockState::Locked));
        let bucket = self.bucket_mut(id)?;
        bucket.unlocked_at = None;
        bucket.duration = duration;
        Ok(())
    }

    /// Unlocked → Unstaked at `now`; the bucket leaves the tally.
    pub fn unstake(
        &mut self,
        registry: &BucketTypeRegistry,
        id: BucketId,
        now: BlockHeight,
    ) -> Result<(), StoreError> {
        let bucket = self.expect_state(id, BucketState::Unlocked)?;
        let index = Self::type_index(registry, bucket.amount, bucket.duration)?;
        let delegate = bucket.delegate;

        self.tally.decrement(&delegate, index, LockState::Unlocked);
        self.bucket_mut(id)?.unstaked_at = Some(now);
        Ok(())
    }

    /// Change amount and duration of a locked bucket.
    pub fn reshape(
        &mut self,
        registry: &BucketTypeRegistry,
        id: BucketId,
        amount: Amount,
        duration: Duration,
    ) -> Result<(), StoreError> {
        let bucket = self.expect_state(id, BucketState::Locked)?;
        let from = Self::type_index(registry, bucket.amount, bucket.duration)?;
        let to = Self::type_index(registry, amount, duration)?;
        let delegate = bucket.delegate;

        self.tally.retype(&delegate, from, to, LockState::Locked);
        let bucket = self.bucket_mut(id)?;
        bucket.amount = amount;
        bucket.duration = duration;
        Ok(())
    }

    /// Point a locked or unlocked bucket at another delegate.
    pub fn redelegate(
        &mut self,
        registry: &BucketTypeRegistry,
        id: BucketId,
        delegate: DelegateId,
    ) -> Result<(), StoreError> {
        let bucket = self.require(id)?;
        let (index, state) =
            Self::slot(registry, bucket)?.ok_or(StoreError::WrongState {
                id,
                state: BucketState::Unstaked,
            })?;
        let previous = bucket.delegate;

        self.tally.redelegate(&previous, &delegate, index, state);
        self.bucket_mut(id)?.delegate = delegate;
        Ok(())
    }

    /// Destroy a bucket in any state, uncounting it if it still counted.
    pub fn remove(
        &mut self,
        registry: &BucketTypeRegistry,
        id: BucketId,
    ) -> Result<Bucket, StoreError> {
        let bucket = self.require(id)?;
        let slot = Self::slot(registry, bucket)?;
        let delegate = bucket.delegate;

        if let Some((index, state)) = slot {
            self.tally.decrement(&delegate, index, state);
        }
        self.buckets.remove(&id).ok_or(StoreError::UnknownBucket(id))
    }

    /// Fold `consumed` into `survivor`.
    ///
    /// The survivor keeps its id and delegate, takes the given amount and
    /// duration, and is forced back to locked. Consumed buckets are destroyed.
    /// All of them must be staked and distinct.
    pub fn merge(
        &mut self,
        registry: &BucketTypeRegistry,
        survivor: BucketId,
        consumed: &[BucketId],
        amount: Amount,
        duration: Duration,
    ) -> Result<(), StoreError> {
        let target = Self::type_index(registry, amount, duration)?;

        let mut seen = HashSet::with_capacity(consumed.len() + 1);
        let mut uncount = Vec::with_capacity(consumed.len() + 1);
        for &id in std::iter::once(&survivor).chain(consumed) {
            let bucket = self.require(id)?;
            if !seen.insert(id) {
                return Err(StoreError::Corruption(format!(
                    "bucket {id} listed twice in merge"
                )));
            }
            let (index, state) =
                Self::slot(registry, bucket)?.ok_or(StoreError::WrongState {
                    id,
                    state: BucketState::Unstaked,
                })?;
            uncount.push((bucket.delegate, index, state));
        }
        let delegate = uncount[0].0;

        for (d, index, state) in &uncount {
            self.tally.decrement(d, *index, *state);
        }
        for id in consumed {
            self.buckets.remove(id);
        }
        self.tally.increment(&delegate, target, LockState::Locked);
        let bucket = self.bucket_mut(survivor)?;
        bucket.amount = amount;
        bucket.duration = duration;
        bucket.unlocked_at = None;
        bucket.unstaked_at = None;
        Ok(())
    }

    /// The tally slot a bucket occupies, or `None` once unstaked.
    fn slot(
        registry: &BucketTypeRegistry,
        bucket: &Bucket,
    ) -> Result<Option<(TypeIndex, LockState)>, StoreError> {
        match bucket.state().lock_state() {
            Some(state) => {
                let index = Self::type_index(registry, bucket.amount, bucket.duration)?;
                Ok(Some((index, state)))
            }
            None => Ok(None),
        }
    }

    fn type_index(
        registry: &BucketTypeRegistry,
        amount: Amount,
        duration: Duration,
    ) -> Result<TypeIndex, StoreError> {
        registry
            .index_of(amount, duration)
            .ok_or(StoreError::UnregisteredType { amount, duration })
    }

    fn expect_state(&self, id: BucketId, expected: BucketState) -> Result<&Bucket, StoreError> {
        let bucket = self.require(id)?;
        let state = bucket.state();
        if state != expected {
            return Err(StoreError::WrongState { id, state });
        }
        Ok(bucket)
    }

    fn bucket_mut(&mut self, id: BucketId) -> Result<&mut Bucket, StoreError> {
        self.buckets
            .get_mut(&id)
            .ok_or(StoreError::UnknownBucket(id))
    }
}

impl Default for BucketStore {
    fn default() -> Self {
        Self::new()
    }
}
