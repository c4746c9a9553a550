//! Core bucket lifecycle engine.

use crate::collaborators::Collaborators;
use crate::config::StakingConfig;
use crate::error::StakingError;
use crate::events::StakingEvent;
use bucket_registry::{BucketType, BucketTypeRegistry, RegistryError, TypeIndex};
use bucket_store::{Bucket, BucketStore};
use bucket_tally::TallyRow;
use bucket_types::{
    Address, Amount, BlockHeight, BucketId, BucketState, DelegateId, Duration, LockState,
};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// The lifecycle engine: stake, lock, unlock, unstake, withdraw and the
/// reshaping operations, over one registry and one bucket store.
///
/// Every public mutation takes `&mut self`, so a call and its tally updates
/// form a single unit. Validation runs to completion before the first write;
/// an `Err` means nothing changed, for batches as well as single calls.
pub struct LifecycleEngine {
    pub(crate) config: StakingConfig,
    pub(crate) registry: BucketTypeRegistry,
    pub(crate) store: BucketStore,
    pub(crate) deps: Collaborators,
}

impl LifecycleEngine {
    /// Create an empty engine. Applies `initial_penalty_rate` to the fee account.
    pub fn new(config: StakingConfig, deps: Collaborators) -> Result<Self, StakingError> {
        config.validate()?;
        deps.fees.set_penalty_rate(config.initial_penalty_rate);
        let registry = BucketTypeRegistry::new(config.type_policy());
        Ok(Self {
            config,
            registry,
            store: BucketStore::new(),
            deps,
        })
    }

    pub fn config(&self) -> &StakingConfig {
        &self.config
    }

    pub fn registry(&self) -> &BucketTypeRegistry {
        &self.registry
    }

    pub fn now(&self) -> BlockHeight {
        self.deps.clock.now()
    }

    // ── Single-bucket lifecycle ────────────────────────────────────────

    /// Open a locked bucket for `caller`. `paid` must equal `amount`.
    pub fn stake(
        &mut self,
        caller: &Address,
        amount: Amount,
        duration: Duration,
        delegate: DelegateId,
        paid: Amount,
    ) -> Result<BucketId, StakingError> {
        self.ensure_running()?;
        self.active_type(amount, duration)?;
        if paid != amount {
            return Err(StakingError::InsufficientPayment {
                expected: amount,
                paid,
            });
        }
        self.open_bucket(caller, amount, duration, delegate)
    }

    /// Re-lock an unlocked bucket, optionally for longer.
    pub fn lock(
        &mut self,
        caller: &Address,
        id: BucketId,
        duration: Duration,
    ) -> Result<(), StakingError> {
        self.ensure_running()?;
        self.check_lock(caller, id, duration)?;
        self.apply_lock(id, duration)
    }

    /// Start the unlock countdown.
    pub fn unlock(&mut self, caller: &Address, id: BucketId) -> Result<(), StakingError> {
        self.ensure_running()?;
        self.check_unlock(caller, id)?;
        let now = self.now();
        self.apply_unlock(id, now)
    }

    /// Leave the tally once the countdown has run out.
    pub fn unstake(&mut self, caller: &Address, id: BucketId) -> Result<(), StakingError> {
        self.ensure_running()?;
        let now = self.now();
        self.check_unstake(caller, id, now)?;
        self.apply_unstake(id, now)
    }

    /// Pay out an unstaked bucket after the withdrawal delay and destroy it.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        id: BucketId,
        recipient: &Address,
    ) -> Result<Amount, StakingError> {
        self.ensure_running()?;
        let now = self.now();
        let amount = self.check_withdraw(caller, id, now)?;
        self.deps.bank.pay(recipient, amount)?;
        self.destroy(id)?;
        debug!(bucket = %id, recipient = %recipient, amount = %amount, "withdrawn");
        self.emit(StakingEvent::Withdrawal {
            id,
            recipient: recipient.clone(),
            amount,
            penalty: Amount::ZERO,
        });
        Ok(amount)
    }

    /// Withdraw a live bucket immediately, forfeiting the penalty share.
    ///
    /// Returns the amount paid to `recipient`.
    pub fn emergency_withdraw(
        &mut self,
        caller: &Address,
        id: BucketId,
        recipient: &Address,
    ) -> Result<Amount, StakingError> {
        self.ensure_running()?;
        let amount = self.owned_bucket(caller, id)?.amount;
        let rate = self.deps.fees.penalty_rate();
        let penalty = amount.percent(rate);
        let payout = amount.saturating_sub(penalty);

        if !payout.is_zero() {
            self.deps.bank.pay(recipient, payout)?;
        }
        self.deps.fees.accrue(penalty);
        self.destroy(id)?;
        warn!(
            bucket = %id,
            recipient = %recipient,
            payout = %payout,
            penalty = %penalty,
            rate,
            "emergency withdrawal"
        );
        self.emit(StakingEvent::Withdrawal {
            id,
            recipient: recipient.clone(),
            amount: payout,
            penalty,
        });
        Ok(payout)
    }

    /// Grow a locked bucket's amount and/or duration.
    ///
    /// `paid` must equal the amount increase exactly.
    pub fn expand(
        &mut self,
        caller: &Address,
        id: BucketId,
        amount: Amount,
        duration: Duration,
        paid: Amount,
    ) -> Result<(), StakingError> {
        self.ensure_running()?;
        let bucket = self.owned_bucket(caller, id)?;
        if bucket.state() != BucketState::Locked {
            return Err(StakingError::NotLockedBucket(id));
        }
        if duration < bucket.duration {
            return Err(StakingError::InvalidDuration {
                current: bucket.duration,
                requested: duration,
            });
        }
        if amount < bucket.amount {
            return Err(StakingError::InvalidAmount {
                current: bucket.amount,
                requested: amount,
            });
        }
        let expected = amount.saturating_sub(bucket.amount);
        if paid != expected {
            return Err(StakingError::InsufficientPayment { expected, paid });
        }
        self.active_type(amount, duration)?;

        self.store.reshape(&self.registry, id, amount, duration)?;
        debug!(bucket = %id, amount = %amount, duration = %duration, "expanded");
        self.emit(StakingEvent::BucketExpanded {
            id,
            amount,
            duration,
        });
        Ok(())
    }

    /// Lengthen a locked bucket, keeping its amount.
    pub fn extend_duration(
        &mut self,
        caller: &Address,
        id: BucketId,
        duration: Duration,
    ) -> Result<(), StakingError> {
        let amount = self.bucket_of(id)?.amount;
        self.expand(caller, id, amount, duration, Amount::ZERO)
    }

    /// Top up a locked bucket, keeping its duration.
    pub fn increase_amount(
        &mut self,
        caller: &Address,
        id: BucketId,
        amount: Amount,
        paid: Amount,
    ) -> Result<(), StakingError> {
        let duration = self.bucket_of(id)?.duration;
        self.expand(caller, id, amount, duration, paid)
    }

    /// Point a staked bucket's votes at another delegate.
    pub fn change_delegate(
        &mut self,
        caller: &Address,
        id: BucketId,
        delegate: DelegateId,
    ) -> Result<(), StakingError> {
        self.ensure_running()?;
        self.check_change_delegate(caller, id, &delegate)?;
        self.apply_change_delegate(id, delegate)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn bucket_of(&self, id: BucketId) -> Result<&Bucket, StakingError> {
        self.store.get(id).ok_or(StakingError::UnknownBucket(id))
    }

    /// Live buckets in id order.
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.store.iter()
    }

    pub fn holder_of(&self, id: BucketId) -> Option<Address> {
        self.deps.ownership.holder_of(id)
    }

    /// Blocks left before an unlocked bucket may be unstaked; zero once ready.
    pub fn blocks_to_unstake(&self, id: BucketId) -> Result<u64, StakingError> {
        let bucket = self.bucket_of(id)?;
        match (bucket.state(), bucket.unstake_ready_at()) {
            (BucketState::Unlocked, Some(ready_at)) => Ok(ready_at.blocks_from(self.now())),
            _ => Err(StakingError::NotUnlockedBucket(id)),
        }
    }

    /// Blocks left before an unstaked bucket may be withdrawn; zero once ready.
    pub fn blocks_to_withdraw(&self, id: BucketId) -> Result<u64, StakingError> {
        let ready_at = self
            .bucket_of(id)?
            .withdraw_ready_at(self.config.withdrawal_delay())
            .ok_or(StakingError::NotUnstakedBucket(id))?;
        Ok(ready_at.blocks_from(self.now()))
    }

    /// Locked bucket counts per delegate, one column per bucket type.
    pub fn locked_votes_to(&self, delegates: &[DelegateId]) -> Vec<Vec<u64>> {
        self.store
            .tally()
            .votes(delegates, self.registry.count(), LockState::Locked)
    }

    /// Unlocked bucket counts per delegate, one column per bucket type.
    pub fn unlocked_votes_to(&self, delegates: &[DelegateId]) -> Vec<Vec<u64>> {
        self.store
            .tally()
            .votes(delegates, self.registry.count(), LockState::Unlocked)
    }

    /// Both columns at once.
    pub fn votes_to(&self, delegates: &[DelegateId]) -> Vec<TallyRow> {
        self.store.tally().query(delegates, self.registry.count())
    }

    /// `(locked, unlocked)` bucket counts across every delegate.
    pub fn total_votes(&self) -> (u64, u64) {
        let tally = self.store.tally();
        (
            tally.total(LockState::Locked),
            tally.total(LockState::Unlocked),
        )
    }

    pub fn num_of_bucket_types(&self) -> usize {
        self.registry.count()
    }

    pub fn bucket_types(&self, offset: usize, limit: usize) -> Result<&[BucketType], StakingError> {
        Ok(self.registry.range(offset, limit)?)
    }

    pub fn bucket_type_at(&self, index: TypeIndex) -> Option<&BucketType> {
        self.registry.get(index)
    }

    pub fn is_active_bucket_type(&self, amount: Amount, duration: Duration) -> bool {
        self.registry.is_active(amount, duration)
    }

    // ── Per-bucket checks and writes, shared with the batch forms ─────

    pub(crate) fn check_lock(
        &self,
        caller: &Address,
        id: BucketId,
        duration: Duration,
    ) -> Result<(), StakingError> {
        let bucket = self.owned_bucket(caller, id)?;
        if bucket.state() != BucketState::Unlocked {
            return Err(StakingError::NotUnlockedBucket(id));
        }
        if duration < bucket.duration {
            return Err(StakingError::InvalidDuration {
                current: bucket.duration,
                requested: duration,
            });
        }
        // Keeping the duration keeps the original type, active or not.
        if duration != bucket.duration {
            self.active_type(bucket.amount, duration)?;
        }
        Ok(())
    }

    pub(crate) fn apply_lock(&mut self, id: BucketId, duration: Duration) -> Result<(), StakingError> {
        self.store.relock(&self.registry, id, duration)?;
        debug!(bucket = %id, duration = %duration, "locked");
        self.emit(StakingEvent::Locked { id, duration });
        Ok(())
    }

    pub(crate) fn check_unlock(&self, caller: &Address, id: BucketId) -> Result<(), StakingError> {
        if self.owned_bucket(caller, id)?.state() != BucketState::Locked {
            return Err(StakingError::NotLockedBucket(id));
        }
        Ok(())
    }

    pub(crate) fn apply_unlock(&mut self, id: BucketId, now: BlockHeight) -> Result<(), StakingError> {
        self.store.unlock(&self.registry, id, now)?;
        debug!(bucket = %id, at = %now, "unlocked");
        self.emit(StakingEvent::Unlocked { id });
        Ok(())
    }

    pub(crate) fn check_unstake(
        &self,
        caller: &Address,
        id: BucketId,
        now: BlockHeight,
    ) -> Result<(), StakingError> {
        let bucket = self.owned_bucket(caller, id)?;
        let ready_at = match (bucket.state(), bucket.unstake_ready_at()) {
            (BucketState::Unlocked, Some(at)) => at,
            _ => return Err(StakingError::NotUnlockedBucket(id)),
        };
        if !ready_at.is_reached(now) {
            return Err(StakingError::NotReadyToUnstake { id, ready_at });
        }
        Ok(())
    }

    pub(crate) fn apply_unstake(&mut self, id: BucketId, now: BlockHeight) -> Result<(), StakingError> {
        self.store.unstake(&self.registry, id, now)?;
        debug!(bucket = %id, at = %now, "unstaked");
        self.emit(StakingEvent::Unstaked { id });
        Ok(())
    }

    /// Returns the amount the withdrawal will pay.
    pub(crate) fn check_withdraw(
        &self,
        caller: &Address,
        id: BucketId,
        now: BlockHeight,
    ) -> Result<Amount, StakingError> {
        let bucket = self.owned_bucket(caller, id)?;
        let ready_at = bucket
            .withdraw_ready_at(self.config.withdrawal_delay())
            .ok_or(StakingError::NotUnstakedBucket(id))?;
        if !ready_at.is_reached(now) {
            return Err(StakingError::NotReadyToWithdraw { id, ready_at });
        }
        Ok(bucket.amount)
    }

    pub(crate) fn check_change_delegate(
        &self,
        caller: &Address,
        id: BucketId,
        delegate: &DelegateId,
    ) -> Result<(), StakingError> {
        let bucket = self.owned_bucket(caller, id)?;
        if !bucket.state().is_staked() {
            return Err(StakingError::NotStakedBucket(id));
        }
        if bucket.delegate == *delegate {
            return Err(StakingError::SameDelegate {
                id,
                delegate: *delegate,
            });
        }
        Ok(())
    }

    pub(crate) fn apply_change_delegate(
        &mut self,
        id: BucketId,
        delegate: DelegateId,
    ) -> Result<(), StakingError> {
        let from = self.bucket_of(id)?.delegate;
        self.store.redelegate(&self.registry, id, delegate)?;
        debug!(bucket = %id, from = %from, to = %delegate, "delegate changed");
        self.emit(StakingEvent::DelegateChanged {
            id,
            from,
            to: delegate,
        });
        Ok(())
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Create the record, mint the handle to `holder`, announce it. The type
    /// must already have been checked.
    pub(crate) fn open_bucket(
        &mut self,
        holder: &Address,
        amount: Amount,
        duration: Duration,
        delegate: DelegateId,
    ) -> Result<BucketId, StakingError> {
        let id = self.store.create(&self.registry, amount, duration, delegate)?;
        self.deps.ownership.mint(id, holder);
        debug!(
            bucket = %id,
            holder = %holder,
            delegate = %delegate,
            amount = %amount,
            duration = %duration,
            "staked"
        );
        self.emit(StakingEvent::Staked {
            id,
            holder: holder.clone(),
            delegate,
            amount,
            duration,
        });
        Ok(id)
    }

    /// Remove the record and burn the handle.
    pub(crate) fn destroy(&mut self, id: BucketId) -> Result<Bucket, StakingError> {
        let bucket = self.store.remove(&self.registry, id)?;
        self.deps.ownership.burn(id);
        Ok(bucket)
    }

    pub(crate) fn ensure_running(&self) -> Result<(), StakingError> {
        if self.deps.pause.is_paused() {
            return Err(StakingError::Paused);
        }
        Ok(())
    }

    pub(crate) fn ensure_admin(&self, caller: &Address) -> Result<(), StakingError> {
        if !self.deps.auth.is_admin(caller) {
            return Err(StakingError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    /// The bucket, provided it exists and `caller` holds it.
    pub(crate) fn owned_bucket(
        &self,
        caller: &Address,
        id: BucketId,
    ) -> Result<&Bucket, StakingError> {
        let bucket = self.bucket_of(id)?;
        if self.deps.ownership.holder_of(id).as_ref() != Some(caller) {
            return Err(StakingError::NotHolder {
                id,
                caller: caller.clone(),
            });
        }
        Ok(bucket)
    }

    /// Index of a type that new commitments may use.
    pub(crate) fn active_type(
        &self,
        amount: Amount,
        duration: Duration,
    ) -> Result<TypeIndex, StakingError> {
        self.registry
            .require_active(amount, duration)
            .map_err(|e| match e {
                RegistryError::UnknownType { amount, duration } => {
                    StakingError::InvalidBucketType { amount, duration }
                }
                RegistryError::InactiveType { amount, duration } => {
                    StakingError::InactiveBucketType { amount, duration }
                }
                other => other.into(),
            })
    }

    pub(crate) fn emit(&self, event: StakingEvent) {
        trace!(event = event.name(), "emit");
        self.deps.events.emit(event);
    }
}

/// Reject empty lists and repeated ids.
pub(crate) fn ensure_distinct(ids: &[BucketId]) -> Result<(), StakingError> {
    if ids.is_empty() {
        return Err(StakingError::EmptyList);
    }
    let mut seen = HashSet::with_capacity(ids.len());
    for &id in ids {
        if !seen.insert(id) {
            return Err(StakingError::DuplicateBucket(id));
        }
    }
    Ok(())
}
