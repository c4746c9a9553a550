//! Multi-bucket operations.
//!
//! Each one validates every element first and only then applies them, so a
//! failing element leaves the whole batch unapplied.

use crate::engine::{ensure_distinct, LifecycleEngine};
use crate::error::StakingError;
use crate::events::StakingEvent;
use bucket_store::StoreError;
use bucket_types::{Address, Amount, BucketId, DelegateId, Duration};
use std::collections::HashSet;
use tracing::debug;

impl LifecycleEngine {
    /// Open `count` identical buckets for one delegate.
    pub fn stake_many(
        &mut self,
        caller: &Address,
        amount: Amount,
        duration: Duration,
        delegate: DelegateId,
        count: u64,
        paid: Amount,
    ) -> Result<Vec<BucketId>, StakingError> {
        self.check_stake_batch(amount, duration, count, paid)?;
        let mut ids = Vec::new();
        for _ in 0..count {
            ids.push(self.open_bucket(caller, amount, duration, delegate)?);
        }
        debug!(count, delegate = %delegate, amount = %amount, "batch staked");
        Ok(ids)
    }

    /// Open one bucket per listed delegate.
    pub fn stake_to_each(
        &mut self,
        caller: &Address,
        amount: Amount,
        duration: Duration,
        delegates: &[DelegateId],
        paid: Amount,
    ) -> Result<Vec<BucketId>, StakingError> {
        self.check_stake_batch(amount, duration, delegates.len() as u64, paid)?;
        let mut ids = Vec::with_capacity(delegates.len());
        for &delegate in delegates {
            ids.push(self.open_bucket(caller, amount, duration, delegate)?);
        }
        debug!(count = ids.len(), amount = %amount, "batch staked");
        Ok(ids)
    }

    fn check_stake_batch(
        &self,
        amount: Amount,
        duration: Duration,
        count: u64,
        paid: Amount,
    ) -> Result<(), StakingError> {
        self.ensure_running()?;
        if count == 0 {
            return Err(StakingError::InvalidParameters(
                "at least one bucket must be requested".into(),
            ));
        }
        let expected = amount.checked_mul(count).ok_or(StakingError::Overflow)?;
        if paid != expected {
            return Err(StakingError::InvalidParameters(format!(
                "deposit {paid} does not equal {count} x {amount}"
            )));
        }
        self.active_type(amount, duration)?;
        if self.store.next_id().as_u64().checked_add(count).is_none() {
            return Err(StoreError::IdExhausted.into());
        }
        Ok(())
    }

    pub fn lock_many(
        &mut self,
        caller: &Address,
        ids: &[BucketId],
        duration: Duration,
    ) -> Result<(), StakingError> {
        self.ensure_running()?;
        ensure_distinct(ids)?;
        for &id in ids {
            self.check_lock(caller, id, duration)?;
        }
        for &id in ids {
            self.apply_lock(id, duration)?;
        }
        Ok(())
    }

    pub fn unlock_many(&mut self, caller: &Address, ids: &[BucketId]) -> Result<(), StakingError> {
        self.ensure_running()?;
        ensure_distinct(ids)?;
        for &id in ids {
            self.check_unlock(caller, id)?;
        }
        let now = self.now();
        for &id in ids {
            self.apply_unlock(id, now)?;
        }
        Ok(())
    }

    pub fn unstake_many(&mut self, caller: &Address, ids: &[BucketId]) -> Result<(), StakingError> {
        self.ensure_running()?;
        ensure_distinct(ids)?;
        let now = self.now();
        for &id in ids {
            self.check_unstake(caller, id, now)?;
        }
        for &id in ids {
            self.apply_unstake(id, now)?;
        }
        Ok(())
    }

    /// Withdraw several buckets with a single payment of their sum.
    pub fn withdraw_many(
        &mut self,
        caller: &Address,
        ids: &[BucketId],
        recipient: &Address,
    ) -> Result<Amount, StakingError> {
        self.ensure_running()?;
        ensure_distinct(ids)?;
        let now = self.now();
        let mut amounts = Vec::with_capacity(ids.len());
        let mut total = Amount::ZERO;
        for &id in ids {
            let amount = self.check_withdraw(caller, id, now)?;
            total = total.checked_add(amount).ok_or(StakingError::Overflow)?;
            amounts.push(amount);
        }

        self.deps.bank.pay(recipient, total)?;
        for (&id, amount) in ids.iter().zip(amounts) {
            self.destroy(id)?;
            self.emit(StakingEvent::Withdrawal {
                id,
                recipient: recipient.clone(),
                amount,
                penalty: Amount::ZERO,
            });
        }
        debug!(count = ids.len(), recipient = %recipient, total = %total, "batch withdrawn");
        Ok(total)
    }

    pub fn change_delegates(
        &mut self,
        caller: &Address,
        ids: &[BucketId],
        delegate: DelegateId,
    ) -> Result<(), StakingError> {
        self.ensure_running()?;
        ensure_distinct(ids)?;
        for &id in ids {
            self.check_change_delegate(caller, id, &delegate)?;
        }
        for &id in ids {
            self.apply_change_delegate(id, delegate)?;
        }
        Ok(())
    }

    /// Fold several staked buckets into the first one.
    ///
    /// The survivor keeps its id and delegate, carries the summed amount plus
    /// `paid`, takes `duration` and ends up locked. The others are destroyed.
    pub fn merge(
        &mut self,
        caller: &Address,
        ids: &[BucketId],
        duration: Duration,
        paid: Amount,
    ) -> Result<BucketId, StakingError> {
        self.ensure_running()?;
        let (&survivor, consumed) = ids.split_first().ok_or(StakingError::EmptyList)?;

        let mut seen = HashSet::with_capacity(ids.len());
        let mut combined = paid;
        let mut longest = Duration::ZERO;
        for &id in ids {
            let bucket = self.owned_bucket(caller, id)?;
            if !bucket.state().is_staked() {
                return Err(StakingError::NotStakedBucket(id));
            }
            if !seen.insert(id) {
                return Err(StakingError::DuplicateBucket(id));
            }
            combined = combined
                .checked_add(bucket.amount)
                .ok_or(StakingError::Overflow)?;
            longest = longest.max(bucket.duration);
        }
        if duration < longest {
            return Err(StakingError::InvalidDuration {
                current: longest,
                requested: duration,
            });
        }
        self.active_type(combined, duration)?;

        self.store
            .merge(&self.registry, survivor, consumed, combined, duration)?;
        for &id in consumed {
            self.deps.ownership.burn(id);
        }
        debug!(
            survivor = %survivor,
            consumed = consumed.len(),
            amount = %combined,
            duration = %duration,
            "merged"
        );
        self.emit(StakingEvent::Merged {
            survivor,
            consumed: consumed.to_vec(),
            amount: combined,
            duration,
        });
        Ok(survivor)
    }
}
