use proptest::prelude::*;
use std::collections::HashMap;

use bucket_registry::BucketTypeRegistry;
use bucket_types::{Amount, BlockHeight, Duration, TypePolicy};

#[derive(Clone, Debug)]
enum Op {
    Add(u8, u8),
    Activate(u8, u8),
    Deactivate(u8, u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u8..6, 1u8..4).prop_map(|(a, d)| Op::Add(a, d)),
        (1u8..6, 1u8..4).prop_map(|(a, d)| Op::Activate(a, d)),
        (1u8..6, 1u8..4).prop_map(|(a, d)| Op::Deactivate(a, d)),
    ]
}

fn key(a: u8, d: u8) -> (Amount, Duration) {
    (Amount::new(a.into()), Duration::blocks_of(d.into()))
}

proptest! {
    /// Indices follow first registration and never move; activity follows
    /// the last successful toggle.
    #[test]
    fn indices_are_stable_and_activity_tracks_toggles(ops in prop::collection::vec(op(), 1..60)) {
        let mut registry = BucketTypeRegistry::new(TypePolicy::permissive());
        let mut model: HashMap<(Amount, Duration), (usize, bool)> = HashMap::new();

        for (height, op) in ops.into_iter().enumerate() {
            let now = BlockHeight::new(height as u64);
            match op {
                Op::Add(a, d) => {
                    let (amount, duration) = key(a, d);
                    let result = registry.add(amount, duration, now);
                    if model.contains_key(&(amount, duration)) {
                        prop_assert!(result.is_err());
                    } else {
                        let index = result.unwrap();
                        prop_assert_eq!(index, model.len());
                        model.insert((amount, duration), (index, true));
                    }
                }
                Op::Activate(a, d) | Op::Deactivate(a, d) => {
                    let want = matches!(op, Op::Activate(..));
                    let (amount, duration) = key(a, d);
                    let result = if want {
                        registry.activate(amount, duration, now)
                    } else {
                        registry.deactivate(amount, duration, now)
                    };
                    match model.get_mut(&(amount, duration)) {
                        Some((index, active)) if *active != want => {
                            prop_assert_eq!(result.unwrap(), *index);
                            *active = want;
                        }
                        _ => prop_assert!(result.is_err()),
                    }
                }
            }
        }

        prop_assert_eq!(registry.count(), model.len());
        for ((amount, duration), (index, active)) in model {
            prop_assert_eq!(registry.index_of(amount, duration), Some(index));
            prop_assert_eq!(registry.is_active(amount, duration), active);
            prop_assert_eq!(registry.require_active(amount, duration).is_ok(), active);
        }
    }
}
