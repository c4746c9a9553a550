//! The registry itself.

use crate::bucket_type::{BucketType, TypeIndex};
use crate::error::RegistryError;
use bucket_types::{Amount, BlockHeight, Duration, TypePolicy};
use std::collections::HashMap;

/// Registry of bucket types.
///
/// Owned by the lifecycle engine and passed explicitly; there is no global
/// instance. Indices are assigned in insertion order and never reused.
#[derive(Clone, Debug)]
pub struct BucketTypeRegistry {
    policy: TypePolicy,
    types: Vec<BucketType>,
    /// (amount, duration) → index into `types`.
    lookup: HashMap<(Amount, Duration), TypeIndex>,
}

impl BucketTypeRegistry {
    pub fn new(policy: TypePolicy) -> Self {
        Self {
            policy,
            types: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Rebuild a registry from a persisted type list, preserving indices.
    pub fn from_types(policy: TypePolicy, types: Vec<BucketType>) -> Result<Self, RegistryError> {
        let mut lookup = HashMap::with_capacity(types.len());
        for (index, t) in types.iter().enumerate() {
            if lookup.insert((t.amount, t.duration), index).is_some() {
                return Err(RegistryError::DuplicateType {
                    amount: t.amount,
                    duration: t.duration,
                });
            }
        }
        Ok(Self {
            policy,
            types,
            lookup,
        })
    }

    pub fn policy(&self) -> &TypePolicy {
        &self.policy
    }

    /// Register a new type, active from `now`. Returns its index.
    pub fn add(
        &mut self,
        amount: Amount,
        duration: Duration,
        now: BlockHeight,
    ) -> Result<TypeIndex, RegistryError> {
        if !self.policy.amount_allowed(amount) {
            return Err(RegistryError::InvalidAmount(amount));
        }
        if !self.policy.duration_allowed(duration) {
            return Err(RegistryError::InvalidDuration(duration));
        }
        if self.lookup.contains_key(&(amount, duration)) {
            return Err(RegistryError::DuplicateType { amount, duration });
        }
        let index = self.types.len();
        self.types.push(BucketType::new(amount, duration, now));
        self.lookup.insert((amount, duration), index);
        Ok(index)
    }

    /// Re-open a deactivated type. Its index is unchanged.
    pub fn activate(
        &mut self,
        amount: Amount,
        duration: Duration,
        now: BlockHeight,
    ) -> Result<TypeIndex, RegistryError> {
        let index = self.known(amount, duration)?;
        let t = &mut self.types[index];
        if t.is_active() {
            return Err(RegistryError::AlreadyInState {
                amount,
                duration,
                active: true,
            });
        }
        t.reopen(now);
        Ok(index)
    }

    /// Stop accepting new commitments to a type. Existing buckets keep it.
    pub fn deactivate(
        &mut self,
        amount: Amount,
        duration: Duration,
        now: BlockHeight,
    ) -> Result<TypeIndex, RegistryError> {
        let index = self.known(amount, duration)?;
        let t = &mut self.types[index];
        if !t.is_active() {
            return Err(RegistryError::AlreadyInState {
                amount,
                duration,
                active: false,
            });
        }
        t.close(now);
        Ok(index)
    }

    pub fn index_of(&self, amount: Amount, duration: Duration) -> Option<TypeIndex> {
        self.lookup.get(&(amount, duration)).copied()
    }

    pub fn is_active(&self, amount: Amount, duration: Duration) -> bool {
        self.index_of(amount, duration)
            .map(|i| self.types[i].is_active())
            .unwrap_or(false)
    }

    /// Index of a type that must exist and be active: the gate for every new
    /// commitment.
    pub fn require_active(
        &self,
        amount: Amount,
        duration: Duration,
    ) -> Result<TypeIndex, RegistryError> {
        let index = self.known(amount, duration)?;
        if !self.types[index].is_active() {
            return Err(RegistryError::InactiveType { amount, duration });
        }
        Ok(index)
    }

    pub fn get(&self, index: TypeIndex) -> Option<&BucketType> {
        self.types.get(index)
    }

    pub fn count(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Up to `limit` types starting at `offset`.
    pub fn range(&self, offset: usize, limit: usize) -> Result<&[BucketType], RegistryError> {
        if offset >= self.types.len() {
            return Err(RegistryError::InvalidRange {
                offset,
                count: self.types.len(),
            });
        }
        let end = offset.saturating_add(limit).min(self.types.len());
        Ok(&self.types[offset..end])
    }

    /// All types in index order.
    pub fn types(&self) -> &[BucketType] {
        &self.types
    }

    fn known(&self, amount: Amount, duration: Duration) -> Result<TypeIndex, RegistryError> {
        self.index_of(amount, duration)
            .ok_or(RegistryError::UnknownType { amount, duration })
    }
}

impl Default for BucketTypeRegistry {
    fn default() -> Self {
        Self::new(TypePolicy::default())
    }
}
