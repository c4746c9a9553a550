#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use bucket_engine::{LifecycleEngine, StakingConfig};
use bucket_nullables::NullEnvironment;
use bucket_types::{Address, Amount, BucketId, BucketState, DelegateId, Duration};

#[derive(Arbitrary, Debug)]
enum Op {
    AddType { amount: u8, duration: u8 },
    ToggleType { amount: u8, duration: u8, active: bool },
    Stake { holder: bool, amount: u8, duration: u8, delegate: u8 },
    Lock { holder: bool, id: u8, duration: u8 },
    Unlock { holder: bool, id: u8 },
    Unstake { holder: bool, id: u8 },
    Withdraw { holder: bool, id: u8 },
    Emergency { holder: bool, id: u8 },
    Expand { holder: bool, id: u8, amount: u8, duration: u8, paid: u8 },
    Delegate { holder: bool, id: u8, delegate: u8 },
    Merge { holder: bool, ids: Vec<u8>, duration: u8, paid: u8 },
    Transfer { holder: bool, id: u8 },
    PenaltyRate(u8),
    Advance(u8),
}

fn who(holder: bool) -> Address {
    Address::from(if holder { "alice" } else { "bob" })
}

fn other(holder: bool) -> Address {
    who(!holder)
}

// Any sequence of calls keeps the tally in step with the live buckets.
fuzz_target!(|ops: Vec<Op>| {
    let admin = Address::from("admin");
    let env = NullEnvironment::new(admin.clone());
    let config = StakingConfig {
        duration_unit: 1,
        min_duration: 1,
        max_duration: 255,
        withdrawal_delay: 3,
        ..StakingConfig::default()
    };
    let Ok(mut engine) = LifecycleEngine::new(config, env.collaborators()) else {
        return;
    };

    for op in ops.into_iter().take(256) {
        let _ = match op {
            Op::AddType { amount, duration } => engine
                .add_bucket_type(&admin, Amount::new(amount.into()), Duration::blocks_of(duration.into()))
                .map(|_| ()),
            Op::ToggleType { amount, duration, active } => {
                let (amount, duration) = (Amount::new(amount.into()), Duration::blocks_of(duration.into()));
                if active {
                    engine.activate_bucket_type(&admin, amount, duration).map(|_| ())
                } else {
                    engine.deactivate_bucket_type(&admin, amount, duration).map(|_| ())
                }
            }
            Op::Stake { holder, amount, duration, delegate } => {
                let amount = Amount::new(amount.into());
                engine
                    .stake(
                        &who(holder),
                        amount,
                        Duration::blocks_of(duration.into()),
                        DelegateId::new([delegate % 4; 12]),
                        amount,
                    )
                    .map(|_| ())
            }
            Op::Lock { holder, id, duration } => {
                engine.lock(&who(holder), BucketId::new(id.into()), Duration::blocks_of(duration.into()))
            }
            Op::Unlock { holder, id } => engine.unlock(&who(holder), BucketId::new(id.into())),
            Op::Unstake { holder, id } => engine.unstake(&who(holder), BucketId::new(id.into())),
            Op::Withdraw { holder, id } => engine
                .withdraw(&who(holder), BucketId::new(id.into()), &who(holder))
                .map(|_| ()),
            Op::Emergency { holder, id } => engine
                .emergency_withdraw(&who(holder), BucketId::new(id.into()), &who(holder))
                .map(|_| ()),
            Op::Expand { holder, id, amount, duration, paid } => engine.expand(
                &who(holder),
                BucketId::new(id.into()),
                Amount::new(amount.into()),
                Duration::blocks_of(duration.into()),
                Amount::new(paid.into()),
            ),
            Op::Delegate { holder, id, delegate } => engine.change_delegate(
                &who(holder),
                BucketId::new(id.into()),
                DelegateId::new([delegate % 4; 12]),
            ),
            Op::Merge { holder, ids, duration, paid } => {
                let ids: Vec<BucketId> = ids.into_iter().take(8).map(|n| BucketId::new(n.into())).collect();
                engine
                    .merge(&who(holder), &ids, Duration::blocks_of(duration.into()), Amount::new(paid.into()))
                    .map(|_| ())
            }
            Op::Transfer { holder, id } => {
                engine.transfer(&who(holder), BucketId::new(id.into()), &other(holder))
            }
            Op::PenaltyRate(rate) => engine.set_penalty_rate(&admin, rate),
            Op::Advance(blocks) => {
                env.clock.advance(blocks.into());
                Ok(())
            }
        };

        let locked = engine.buckets().filter(|b| b.state() == BucketState::Locked).count() as u64;
        let unlocked = engine.buckets().filter(|b| b.state() == BucketState::Unlocked).count() as u64;
        assert_eq!(engine.total_votes(), (locked, unlocked));
        assert_eq!(engine.buckets().count(), env.ownership.len());
    }
});
