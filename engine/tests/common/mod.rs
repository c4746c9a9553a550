#![allow(dead_code)]

use bucket_engine::{LifecycleEngine, StakingConfig};
use bucket_nullables::NullEnvironment;
use bucket_types::{Address, Amount, BucketId, DelegateId, Duration};

pub const WITHDRAWAL_DELAY: u64 = 10;

pub fn addr(name: &str) -> Address {
    Address::from(name)
}

pub fn admin() -> Address {
    addr("admin")
}

pub fn alice() -> Address {
    addr("alice")
}

pub fn bob() -> Address {
    addr("bob")
}

pub fn delegate(n: u8) -> DelegateId {
    DelegateId::new([n; 12])
}

pub fn blocks(n: u64) -> Duration {
    Duration::blocks_of(n)
}

/// Block-granular durations, a short withdrawal delay.
pub fn test_config() -> StakingConfig {
    StakingConfig {
        withdrawal_delay: WITHDRAWAL_DELAY,
        duration_unit: 1,
        min_duration: 1,
        max_duration: 1_000_000,
        ..StakingConfig::default()
    }
}

pub struct Harness {
    pub engine: LifecycleEngine,
    pub env: NullEnvironment,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: StakingConfig) -> Self {
        let env = NullEnvironment::new(admin());
        let engine = LifecycleEngine::new(config, env.collaborators()).unwrap();
        Self { engine, env }
    }

    pub fn add_type(&mut self, amount: Amount, duration: Duration) {
        self.engine
            .add_bucket_type(&admin(), amount, duration)
            .unwrap();
    }

    pub fn stake(
        &mut self,
        holder: &Address,
        amount: Amount,
        duration: Duration,
        to: DelegateId,
    ) -> BucketId {
        self.engine
            .stake(holder, amount, duration, to, amount)
            .unwrap()
    }

    pub fn advance(&self, n: u64) {
        self.env.clock.advance(n);
    }

    /// `(locked, unlocked)` for one delegate at one type index.
    pub fn votes(&self, d: DelegateId, index: usize) -> (u64, u64) {
        let row = &self.engine.votes_to(&[d])[0];
        (row.locked[index], row.unlocked[index])
    }
}
