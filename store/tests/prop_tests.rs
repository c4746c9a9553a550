use proptest::prelude::*;

use bucket_registry::BucketTypeRegistry;
use bucket_store::BucketStore;
use bucket_types::{
    Amount, BlockHeight, BucketId, BucketState, DelegateId, Duration, LockState, TypePolicy,
};

#[derive(Clone, Debug)]
enum Op {
    Create { ty: usize, delegate: u8 },
    Unlock(u64),
    Relock { id: u64, ty: usize },
    Unstake(u64),
    Redelegate { id: u64, delegate: u8 },
    Remove(u64),
    Merge { ids: Vec<u64>, ty: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0u8..3).prop_map(|(ty, delegate)| Op::Create { ty, delegate }),
        (1u64..12).prop_map(Op::Unlock),
        (1u64..12, 0usize..4).prop_map(|(id, ty)| Op::Relock { id, ty }),
        (1u64..12).prop_map(Op::Unstake),
        (1u64..12, 0u8..3).prop_map(|(id, delegate)| Op::Redelegate { id, delegate }),
        (1u64..12).prop_map(Op::Remove),
        (prop::collection::vec(1u64..12, 1..4), 0usize..4)
            .prop_map(|(ids, ty)| Op::Merge { ids, ty }),
    ]
}

fn registry() -> BucketTypeRegistry {
    let mut r = BucketTypeRegistry::new(TypePolicy::permissive());
    for (amount, blocks) in [(10, 10), (10, 20), (20, 20), (40, 40)] {
        r.add(Amount::new(amount), Duration::blocks_of(blocks), BlockHeight::GENESIS)
            .unwrap();
    }
    r
}

fn count_state(store: &BucketStore, state: BucketState) -> u64 {
    store.iter().filter(|b| b.state() == state).count() as u64
}

proptest! {
    /// Whatever sequence of operations is applied, successful or not, the
    /// tally totals equal the number of buckets in each lock state.
    #[test]
    fn tally_totals_match_bucket_states(ops in prop::collection::vec(op(), 1..60)) {
        let r = registry();
        let types = r.types().to_vec();
        let mut store = BucketStore::new();

        for (step, op) in ops.into_iter().enumerate() {
            let now = BlockHeight::new(step as u64);
            let _ = match op {
                Op::Create { ty, delegate } => store
                    .create(&r, types[ty].amount, types[ty].duration, DelegateId::new([delegate; 12]))
                    .map(|_| ()),
                Op::Unlock(id) => store.unlock(&r, BucketId::new(id), now),
                Op::Relock { id, ty } => store.relock(&r, BucketId::new(id), types[ty].duration),
                Op::Unstake(id) => store.unstake(&r, BucketId::new(id), now),
                Op::Redelegate { id, delegate } => {
                    store.redelegate(&r, BucketId::new(id), DelegateId::new([delegate; 12]))
                }
                Op::Remove(id) => store.remove(&r, BucketId::new(id)).map(|_| ()),
                Op::Merge { ids, ty } => {
                    let ids: Vec<BucketId> = ids.into_iter().map(BucketId::new).collect();
                    store.merge(&r, ids[0], &ids[1..], types[ty].amount, types[ty].duration)
                }
            };

            prop_assert_eq!(
                store.tally().total(LockState::Locked),
                count_state(&store, BucketState::Locked)
            );
            prop_assert_eq!(
                store.tally().total(LockState::Unlocked),
                count_state(&store, BucketState::Unlocked)
            );
        }
    }

    /// A restored store reproduces the original tally exactly.
    #[test]
    fn restore_reproduces_tally(
        creates in prop::collection::vec((0usize..4, 0u8..3), 1..20),
        unlock_mask in prop::collection::vec(any::<bool>(), 20),
    ) {
        let r = registry();
        let types = r.types().to_vec();
        let mut store = BucketStore::new();
        for (ty, delegate) in creates {
            store
                .create(&r, types[ty].amount, types[ty].duration, DelegateId::new([delegate; 12]))
                .unwrap();
        }
        let ids: Vec<BucketId> = store.iter().map(|b| b.id).collect();
        for (id, unlock) in ids.into_iter().zip(unlock_mask) {
            if unlock {
                store.unlock(&r, id, BlockHeight::new(1)).unwrap();
            }
        }

        let restored =
            BucketStore::restore(&r, store.iter().cloned().collect(), store.next_id()).unwrap();
        let delegates: Vec<DelegateId> = (0u8..3).map(|n| DelegateId::new([n; 12])).collect();
        prop_assert_eq!(
            restored.tally().query(&delegates, r.count()),
            store.tally().query(&delegates, r.count())
        );
    }
}
