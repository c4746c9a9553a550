//! Single-bucket lifecycle tests: the engine wired to nullables, driven
//! through stake → lock/unlock → unstake → withdraw and the reshaping calls.

mod common;

use bucket_engine::{StakingError, StakingEvent};
use bucket_types::amount::UNIT;
use bucket_types::{Amount, BlockHeight, BucketState, ErrorKind};
use common::*;

fn one_unit_type() -> Harness {
    let mut h = Harness::new();
    h.add_type(Amount::units(1), blocks(100));
    h
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn stake_unlock_unstake_moves_votes() {
    let mut h = one_unit_type();
    let d = delegate(1);
    let id = h.stake(&alice(), Amount::units(1), blocks(100), d);
    assert_eq!(h.votes(d, 0), (1, 0));

    h.engine.unlock(&alice(), id).unwrap();
    assert_eq!(h.votes(d, 0), (0, 1));

    h.advance(100);
    h.engine.unstake(&alice(), id).unwrap();
    assert_eq!(h.votes(d, 0), (0, 0));
    assert_eq!(h.engine.bucket_of(id).unwrap().state(), BucketState::Unstaked);
}

#[test]
fn vote_queries_cover_every_type_column() {
    let mut h = one_unit_type();
    h.add_type(Amount::units(2), blocks(100));
    let a = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.stake(&alice(), Amount::units(2), blocks(100), delegate(1));
    h.stake(&bob(), Amount::units(2), blocks(100), delegate(2));
    h.engine.unlock(&alice(), a).unwrap();

    let delegates = [delegate(1), delegate(2), delegate(3)];
    assert_eq!(
        h.engine.locked_votes_to(&delegates),
        vec![vec![0, 1], vec![0, 1], vec![0, 0]]
    );
    assert_eq!(
        h.engine.unlocked_votes_to(&delegates),
        vec![vec![1, 0], vec![0, 0], vec![0, 0]]
    );
    assert!(h.engine.locked_votes_to(&[]).is_empty());
}

#[test]
fn stake_round_trips_through_bucket_of() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(2));
    let bucket = h.engine.bucket_of(id).unwrap();
    assert_eq!(bucket.amount, Amount::units(1));
    assert_eq!(bucket.duration, blocks(100));
    assert_eq!(bucket.delegate, delegate(2));
    assert_eq!(bucket.unlocked_at, None);
    assert_eq!(bucket.unstaked_at, None);
    assert_eq!(h.engine.holder_of(id), Some(alice()));
}

#[test]
fn withdraw_pays_recipient_and_destroys_bucket() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.engine.unlock(&alice(), id).unwrap();
    h.advance(100);
    h.engine.unstake(&alice(), id).unwrap();
    h.advance(WITHDRAWAL_DELAY);

    let paid = h.engine.withdraw(&alice(), id, &bob()).unwrap();
    assert_eq!(paid, Amount::units(1));
    assert_eq!(h.env.bank.paid_to(&bob()), Amount::units(1));
    assert!(matches!(
        h.engine.bucket_of(id),
        Err(StakingError::UnknownBucket(_))
    ));
    assert_eq!(h.engine.holder_of(id), None);
    assert_eq!(
        h.env.events.last(),
        Some(StakingEvent::Withdrawal {
            id,
            recipient: bob(),
            amount: Amount::units(1),
            penalty: Amount::ZERO,
        })
    );
}

// ---------------------------------------------------------------------------
// Timing gates
// ---------------------------------------------------------------------------

#[test]
fn unstake_before_duration_elapses_is_timing_error() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.advance(5);
    h.engine.unlock(&alice(), id).unwrap();
    h.advance(99);

    let err = h.engine.unstake(&alice(), id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timing);
    assert!(matches!(
        err,
        StakingError::NotReadyToUnstake { ready_at, .. } if ready_at == BlockHeight::new(105)
    ));
    assert_eq!(h.engine.blocks_to_unstake(id).unwrap(), 1);

    h.advance(1);
    assert_eq!(h.engine.blocks_to_unstake(id).unwrap(), 0);
    h.engine.unstake(&alice(), id).unwrap();
}

#[test]
fn withdraw_before_delay_is_timing_error() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.engine.unlock(&alice(), id).unwrap();
    h.advance(100);
    h.engine.unstake(&alice(), id).unwrap();
    h.advance(WITHDRAWAL_DELAY - 1);

    let err = h.engine.withdraw(&alice(), id, &alice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timing);
    assert_eq!(h.engine.blocks_to_withdraw(id).unwrap(), 1);
    assert!(h.env.bank.payments().is_empty());
}

#[test]
fn countdown_queries_require_matching_state() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    assert!(matches!(
        h.engine.blocks_to_unstake(id),
        Err(StakingError::NotUnlockedBucket(_))
    ));
    assert!(matches!(
        h.engine.blocks_to_withdraw(id),
        Err(StakingError::NotUnstakedBucket(_))
    ));
    h.engine.unlock(&alice(), id).unwrap();
    assert_eq!(h.engine.blocks_to_unstake(id).unwrap(), 100);
}

// ---------------------------------------------------------------------------
// State and ownership errors
// ---------------------------------------------------------------------------

#[test]
fn wrong_state_transitions_are_rejected() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));

    assert!(matches!(
        h.engine.lock(&alice(), id, blocks(100)),
        Err(StakingError::NotUnlockedBucket(_))
    ));
    assert!(matches!(
        h.engine.unstake(&alice(), id),
        Err(StakingError::NotUnlockedBucket(_))
    ));
    assert!(matches!(
        h.engine.withdraw(&alice(), id, &alice()),
        Err(StakingError::NotUnstakedBucket(_))
    ));

    h.engine.unlock(&alice(), id).unwrap();
    let err = h.engine.unlock(&alice(), id).unwrap_err();
    assert!(matches!(err, StakingError::NotLockedBucket(_)));
    assert_eq!(err.kind(), ErrorKind::State);
}

#[test]
fn non_holder_cannot_touch_bucket() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    let err = h.engine.unlock(&bob(), id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(h.votes(delegate(1), 0), (1, 0));
}

#[test]
fn unknown_bucket_is_not_found() {
    let mut h = one_unit_type();
    let err = h
        .engine
        .unlock(&alice(), bucket_types::BucketId::new(42))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn stake_requires_registered_active_type_and_exact_payment() {
    let mut h = one_unit_type();
    let err = h
        .engine
        .stake(&alice(), Amount::units(2), blocks(100), delegate(1), Amount::units(2))
        .unwrap_err();
    assert!(matches!(err, StakingError::InvalidBucketType { .. }));

    let err = h
        .engine
        .stake(&alice(), Amount::units(1), blocks(100), delegate(1), Amount::new(1))
        .unwrap_err();
    assert!(matches!(err, StakingError::InsufficientPayment { .. }));

    h.engine
        .deactivate_bucket_type(&admin(), Amount::units(1), blocks(100))
        .unwrap();
    let err = h
        .engine
        .stake(&alice(), Amount::units(1), blocks(100), delegate(1), Amount::units(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Policy);
    assert_eq!(h.engine.buckets().count(), 0);
}

#[test]
fn paused_engine_rejects_mutations_but_answers_queries() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.env.pause.pause();

    assert!(matches!(
        h.engine.unlock(&alice(), id),
        Err(StakingError::Paused)
    ));
    assert!(h.engine.bucket_of(id).is_ok());
    assert_eq!(h.engine.total_votes(), (1, 0));

    h.env.pause.unpause();
    h.engine.unlock(&alice(), id).unwrap();
}

// ---------------------------------------------------------------------------
// Re-lock and the grandfather rule
// ---------------------------------------------------------------------------

#[test]
fn relock_with_longer_duration_moves_type_index() {
    let mut h = one_unit_type();
    h.add_type(Amount::units(1), blocks(200));
    let d = delegate(1);
    let id = h.stake(&alice(), Amount::units(1), blocks(100), d);
    h.engine.unlock(&alice(), id).unwrap();

    h.engine.lock(&alice(), id, blocks(200)).unwrap();
    assert_eq!(h.votes(d, 0), (0, 0));
    assert_eq!(h.votes(d, 1), (1, 0));
    assert_eq!(h.engine.bucket_of(id).unwrap().duration, blocks(200));
}

#[test]
fn relock_shorter_is_invalid_duration() {
    let mut h = one_unit_type();
    h.add_type(Amount::units(1), blocks(50));
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.engine.unlock(&alice(), id).unwrap();
    let err = h.engine.lock(&alice(), id, blocks(50)).unwrap_err();
    assert!(matches!(err, StakingError::InvalidDuration { .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn deactivated_type_is_grandfathered_for_same_duration_relock() {
    let mut h = one_unit_type();
    h.add_type(Amount::units(1), blocks(200));
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.engine.unlock(&alice(), id).unwrap();
    h.engine
        .deactivate_bucket_type(&admin(), Amount::units(1), blocks(100))
        .unwrap();

    h.engine.lock(&alice(), id, blocks(100)).unwrap();
    assert_eq!(h.votes(delegate(1), 0), (1, 0));

    h.engine.unlock(&alice(), id).unwrap();
    h.engine
        .deactivate_bucket_type(&admin(), Amount::units(1), blocks(200))
        .unwrap();
    let err = h.engine.lock(&alice(), id, blocks(200)).unwrap_err();
    assert!(matches!(err, StakingError::InactiveBucketType { .. }));
}

// ---------------------------------------------------------------------------
// Emergency withdrawal
// ---------------------------------------------------------------------------

#[test]
fn emergency_withdraw_at_ninety_percent_pays_a_tenth() {
    let mut h = one_unit_type();
    h.engine.set_penalty_rate(&admin(), 90).unwrap();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));

    let paid = h.engine.emergency_withdraw(&alice(), id, &alice()).unwrap();
    assert_eq!(paid, Amount::new(UNIT / 10));
    assert_eq!(h.env.bank.paid_to(&alice()), Amount::new(UNIT / 10));
    assert_eq!(h.engine.accumulated_fee(), Amount::new(UNIT / 10 * 9));
    assert_eq!(h.votes(delegate(1), 0), (0, 0));

    let err = h.engine.bucket_of(id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn emergency_withdraw_works_from_every_live_state() {
    let mut h = one_unit_type();
    let locked = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    let unlocked = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    let unstaked = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.engine.unlock(&alice(), unlocked).unwrap();
    h.engine.unlock(&alice(), unstaked).unwrap();
    h.advance(100);
    h.engine.unstake(&alice(), unstaked).unwrap();

    for id in [locked, unlocked, unstaked] {
        h.engine.emergency_withdraw(&alice(), id, &alice()).unwrap();
    }
    assert_eq!(h.engine.total_votes(), (0, 0));
    assert_eq!(h.env.bank.paid_to(&alice()), Amount::units(3));
    assert!(h.env.ownership.is_empty());
}

#[test]
fn failed_payout_leaves_bucket_in_place() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.env.bank.reject("frozen");

    let err = h.engine.emergency_withdraw(&alice(), id, &alice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Collaborator);
    assert!(h.engine.bucket_of(id).is_ok());
    assert_eq!(h.votes(delegate(1), 0), (1, 0));
    assert_eq!(h.engine.accumulated_fee(), Amount::ZERO);
}

// ---------------------------------------------------------------------------
// Expand and delegate changes
// ---------------------------------------------------------------------------

#[test]
fn expand_reindexes_and_requires_exact_top_up() {
    let mut h = one_unit_type();
    h.add_type(Amount::units(3), blocks(300));
    let d = delegate(1);
    let id = h.stake(&alice(), Amount::units(1), blocks(100), d);

    let err = h
        .engine
        .expand(&alice(), id, Amount::units(3), blocks(300), Amount::units(1))
        .unwrap_err();
    assert!(matches!(err, StakingError::InsufficientPayment { .. }));

    h.engine
        .expand(&alice(), id, Amount::units(3), blocks(300), Amount::units(2))
        .unwrap();
    assert_eq!(h.votes(d, 0), (0, 0));
    assert_eq!(h.votes(d, 1), (1, 0));
    let bucket = h.engine.bucket_of(id).unwrap();
    assert_eq!((bucket.amount, bucket.duration), (Amount::units(3), blocks(300)));
}

#[test]
fn expand_rejects_shrinking_and_unlocked_buckets() {
    let mut h = one_unit_type();
    h.add_type(Amount::units(1), blocks(50));
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));

    assert!(matches!(
        h.engine.extend_duration(&alice(), id, blocks(50)),
        Err(StakingError::InvalidDuration { .. })
    ));
    assert!(matches!(
        h.engine
            .increase_amount(&alice(), id, Amount::new(1), Amount::ZERO),
        Err(StakingError::InvalidAmount { .. })
    ));

    h.engine.unlock(&alice(), id).unwrap();
    assert!(matches!(
        h.engine.extend_duration(&alice(), id, blocks(100)),
        Err(StakingError::NotLockedBucket(_))
    ));
}

#[test]
fn extend_duration_to_unregistered_type_is_rejected() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    assert!(matches!(
        h.engine.extend_duration(&alice(), id, blocks(150)),
        Err(StakingError::InvalidBucketType { .. })
    ));
}

#[test]
fn reshaping_into_deactivated_type_is_rejected() {
    let mut h = one_unit_type();
    h.add_type(Amount::units(1), blocks(200));
    h.add_type(Amount::units(2), blocks(100));
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));

    h.engine
        .deactivate_bucket_type(&admin(), Amount::units(1), blocks(200))
        .unwrap();
    assert!(matches!(
        h.engine.extend_duration(&alice(), id, blocks(200)),
        Err(StakingError::InactiveBucketType { .. })
    ));

    h.engine
        .deactivate_bucket_type(&admin(), Amount::units(2), blocks(100))
        .unwrap();
    assert!(matches!(
        h.engine
            .increase_amount(&alice(), id, Amount::units(2), Amount::units(1)),
        Err(StakingError::InactiveBucketType { .. })
    ));

    // Even a no-op reshape needs the bucket's own type to be active.
    h.engine
        .deactivate_bucket_type(&admin(), Amount::units(1), blocks(100))
        .unwrap();
    assert!(matches!(
        h.engine
            .expand(&alice(), id, Amount::units(1), blocks(100), Amount::ZERO),
        Err(StakingError::InactiveBucketType { .. })
    ));

    let bucket = h.engine.bucket_of(id).unwrap();
    assert_eq!((bucket.amount, bucket.duration), (Amount::units(1), blocks(100)));
    assert_eq!(h.votes(delegate(1), 0), (1, 0));
}

#[test]
fn change_delegate_moves_votes_in_place() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.engine.unlock(&alice(), id).unwrap();

    h.engine.change_delegate(&alice(), id, delegate(2)).unwrap();
    assert_eq!(h.votes(delegate(1), 0), (0, 0));
    assert_eq!(h.votes(delegate(2), 0), (0, 1));

    assert!(matches!(
        h.engine.change_delegate(&alice(), id, delegate(2)),
        Err(StakingError::SameDelegate { .. })
    ));
}

#[test]
fn unstaked_bucket_cannot_change_delegate_or_move() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.engine.unlock(&alice(), id).unwrap();
    h.advance(100);
    h.engine.unstake(&alice(), id).unwrap();

    assert!(matches!(
        h.engine.change_delegate(&alice(), id, delegate(2)),
        Err(StakingError::NotStakedBucket(_))
    ));
    assert!(matches!(
        h.engine.transfer(&alice(), id, &bob()),
        Err(StakingError::NotStakedBucket(_))
    ));
}

#[test]
fn transferred_bucket_follows_new_holder() {
    let mut h = one_unit_type();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.engine.transfer(&alice(), id, &bob()).unwrap();

    assert_eq!(h.engine.holder_of(id), Some(bob()));
    assert!(h.engine.unlock(&alice(), id).is_err());
    h.engine.unlock(&bob(), id).unwrap();
    assert_eq!(
        h.env.events.events().iter().filter(|e| e.name() == "transferred").count(),
        1
    );
}

#[test]
fn every_committed_call_emits_one_event() {
    let mut h = one_unit_type();
    h.env.events.take();
    let id = h.stake(&alice(), Amount::units(1), blocks(100), delegate(1));
    h.engine.unlock(&alice(), id).unwrap();
    let _ = h.engine.unlock(&alice(), id);
    h.advance(100);
    h.engine.unstake(&alice(), id).unwrap();

    let names: Vec<&str> = h.env.events.take().iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["staked", "unlocked", "unstaked"]);
}
