use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bucket_engine::{LifecycleEngine, StakingConfig};
use bucket_nullables::NullEnvironment;
use bucket_types::{Address, Amount, BucketId, DelegateId, Duration};

fn make_engine() -> (LifecycleEngine, NullEnvironment) {
    let env = NullEnvironment::new(Address::from("admin"));
    let config = StakingConfig {
        duration_unit: 1,
        min_duration: 1,
        max_duration: 1_000_000,
        ..StakingConfig::default()
    };
    let mut engine = LifecycleEngine::new(config, env.collaborators()).unwrap();
    for n in 1..=16u128 {
        engine
            .add_bucket_type(&Address::from("admin"), Amount::new(n), Duration::blocks_of(100))
            .unwrap();
    }
    (engine, env)
}

fn bench_stake(c: &mut Criterion) {
    let holder = Address::from("alice");
    let delegate = DelegateId::new([1; 12]);

    c.bench_function("engine_stake", |b| {
        let (mut engine, _env) = make_engine();
        b.iter(|| {
            engine
                .stake(
                    black_box(&holder),
                    Amount::new(1),
                    Duration::blocks_of(100),
                    delegate,
                    Amount::new(1),
                )
                .unwrap()
        });
    });
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_merge");
    let holder = Address::from("alice");
    let delegate = DelegateId::new([1; 12]);

    for width in [2usize, 8, 16] {
        group.bench_with_input(BenchmarkId::new("merge", width), &width, |b, &width| {
            b.iter_batched(
                || {
                    let (mut engine, env) = make_engine();
                    let ids: Vec<BucketId> = (0..width)
                        .map(|_| {
                            engine
                                .stake(
                                    &holder,
                                    Amount::new(1),
                                    Duration::blocks_of(100),
                                    delegate,
                                    Amount::new(1),
                                )
                                .unwrap()
                        })
                        .collect();
                    (engine, env, ids)
                },
                |(mut engine, _env, ids)| {
                    engine
                        .merge(&holder, black_box(&ids), Duration::blocks_of(100), Amount::ZERO)
                        .unwrap()
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_votes_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_votes_to");
    let holder = Address::from("alice");
    let (mut engine, _env) = make_engine();
    let delegates: Vec<DelegateId> = (0..64u8).map(|n| DelegateId::new([n; 12])).collect();
    for (i, d) in delegates.iter().enumerate() {
        let amount = Amount::new((i % 16) as u128 + 1);
        engine
            .stake(&holder, amount, Duration::blocks_of(100), *d, amount)
            .unwrap();
    }

    for n in [1usize, 16, 64] {
        group.bench_with_input(BenchmarkId::new("delegates", n), &n, |b, &n| {
            b.iter(|| black_box(engine.votes_to(black_box(&delegates[..n]))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stake, bench_merge, bench_votes_query);
criterion_main!(benches);
