use proptest::prelude::*;

use bucket_tally::VoteTally;
use bucket_types::{DelegateId, LockState};

fn state(locked: bool) -> LockState {
    if locked {
        LockState::Locked
    } else {
        LockState::Unlocked
    }
}

proptest! {
    /// Whatever sequence of moves is applied to a set of counted buckets,
    /// an incrementally maintained tally equals one rebuilt from scratch.
    #[test]
    fn incremental_matches_rebuild(
        initial in prop::collection::vec((0u8..4, 0usize..3, any::<bool>()), 1..20),
        moves in prop::collection::vec((any::<prop::sample::Index>(), 0u8..4, 0usize..3, any::<bool>()), 0..40),
    ) {
        let mut buckets: Vec<(DelegateId, usize, LockState)> = initial
            .into_iter()
            .map(|(d, i, l)| (DelegateId::new([d; 12]), i, state(l)))
            .collect();

        let mut tally = VoteTally::new();
        for (d, i, s) in &buckets {
            tally.increment(d, *i, *s);
        }

        for (pick, d, i, l) in moves {
            let slot = pick.index(buckets.len());
            let (old_d, old_i, old_s) = buckets[slot];
            let (new_d, new_i, new_s) = (DelegateId::new([d; 12]), i, state(l));
            tally.shift(&old_d, (old_i, old_s), (old_i, new_s));
            tally.retype(&old_d, old_i, new_i, new_s);
            tally.redelegate(&old_d, &new_d, new_i, new_s);
            buckets[slot] = (new_d, new_i, new_s);
        }

        let mut rebuilt = VoteTally::new();
        rebuilt.rebuild(buckets.iter().copied());

        let delegates: Vec<DelegateId> = (0u8..4).map(|d| DelegateId::new([d; 12])).collect();
        prop_assert_eq!(tally.query(&delegates, 3), rebuilt.query(&delegates, 3));
        prop_assert_eq!(tally.total(LockState::Locked), rebuilt.total(LockState::Locked));
        prop_assert_eq!(tally.total(LockState::Unlocked), rebuilt.total(LockState::Unlocked));
    }
}
