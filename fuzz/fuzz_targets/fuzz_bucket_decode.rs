#![no_main]

use libfuzzer_sys::fuzz_target;

use bucket_engine::{LifecycleEngine, StakingConfig};
use bucket_nullables::{NullEnvironment, NullStakingStore};
use bucket_store::{Bucket, StakingStore};
use bucket_types::{Address, BucketId};

// Loading a snapshot from arbitrary bytes must fail cleanly, never panic.
fuzz_target!(|data: &[u8]| {
    let _ = bincode::deserialize::<Bucket>(data);

    let store = NullStakingStore::new();
    let split = data.len() / 2;
    let _ = store.put_meta(b"snapshot", &data[..split]);
    let _ = store.put_bucket(BucketId::new(1), &data[split..]);
    let env = NullEnvironment::new(Address::from("admin"));
    let _ = LifecycleEngine::load_from_store(StakingConfig::default(), env.collaborators(), &store);
});
