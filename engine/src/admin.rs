//! Registry and fee administration, plus handle transfers.

use crate::engine::LifecycleEngine;
use crate::error::StakingError;
use crate::events::StakingEvent;
use bucket_registry::TypeIndex;
use bucket_types::{Address, Amount, BucketId, Duration};
use tracing::{debug, info};

impl LifecycleEngine {
    /// Register a new bucket type, active immediately.
    pub fn add_bucket_type(
        &mut self,
        caller: &Address,
        amount: Amount,
        duration: Duration,
    ) -> Result<TypeIndex, StakingError> {
        self.ensure_admin(caller)?;
        let now = self.now();
        let index = self.registry.add(amount, duration, now)?;
        info!(index, amount = %amount, duration = %duration, "bucket type added");
        self.emit(StakingEvent::BucketTypeActivated {
            index,
            amount,
            duration,
        });
        Ok(index)
    }

    pub fn activate_bucket_type(
        &mut self,
        caller: &Address,
        amount: Amount,
        duration: Duration,
    ) -> Result<TypeIndex, StakingError> {
        self.ensure_admin(caller)?;
        let now = self.now();
        let index = self.registry.activate(amount, duration, now)?;
        info!(index, amount = %amount, duration = %duration, "bucket type activated");
        self.emit(StakingEvent::BucketTypeActivated {
            index,
            amount,
            duration,
        });
        Ok(index)
    }

    /// Stop new commitments to a type. Buckets already on it are unaffected.
    pub fn deactivate_bucket_type(
        &mut self,
        caller: &Address,
        amount: Amount,
        duration: Duration,
    ) -> Result<TypeIndex, StakingError> {
        self.ensure_admin(caller)?;
        let now = self.now();
        let index = self.registry.deactivate(amount, duration, now)?;
        info!(index, amount = %amount, duration = %duration, "bucket type deactivated");
        self.emit(StakingEvent::BucketTypeDeactivated {
            index,
            amount,
            duration,
        });
        Ok(index)
    }

    pub fn penalty_rate(&self) -> u8 {
        self.deps.fees.penalty_rate()
    }

    pub fn set_penalty_rate(&mut self, caller: &Address, rate: u8) -> Result<(), StakingError> {
        self.ensure_admin(caller)?;
        if rate > 100 {
            return Err(StakingError::InvalidPenaltyRate(rate));
        }
        let from = self.deps.fees.penalty_rate();
        self.deps.fees.set_penalty_rate(rate);
        info!(from, to = rate, "penalty rate changed");
        self.emit(StakingEvent::PenaltyRateChanged { from, to: rate });
        Ok(())
    }

    /// Penalties collected and not yet withdrawn.
    pub fn accumulated_fee(&self) -> Amount {
        self.deps.fees.accumulated()
    }

    pub fn withdraw_fee(
        &mut self,
        caller: &Address,
        amount: Amount,
        recipient: &Address,
    ) -> Result<(), StakingError> {
        self.ensure_admin(caller)?;
        let available = self.deps.fees.accumulated();
        if amount > available {
            return Err(StakingError::InsufficientFees {
                requested: amount,
                available,
            });
        }
        self.deps.bank.pay(recipient, amount)?;
        self.deps.fees.deduct(amount);
        info!(recipient = %recipient, amount = %amount, "fees withdrawn");
        self.emit(StakingEvent::FeeWithdrawal {
            recipient: recipient.clone(),
            amount,
        });
        Ok(())
    }

    /// Hand a staked bucket to another holder. Unstaked buckets stay put.
    pub fn transfer(
        &mut self,
        caller: &Address,
        id: BucketId,
        to: &Address,
    ) -> Result<(), StakingError> {
        self.ensure_running()?;
        if !self.owned_bucket(caller, id)?.state().is_staked() {
            return Err(StakingError::NotStakedBucket(id));
        }
        self.deps.ownership.transfer(id, to);
        debug!(bucket = %id, from = %caller, to = %to, "transferred");
        self.emit(StakingEvent::Transferred {
            id,
            from: caller.clone(),
            to: to.clone(),
        });
        Ok(())
    }
}
