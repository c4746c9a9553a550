//! Nullable store: thread-safe in-memory staking storage for testing.

use bucket_store::{StakingStore, StoreError};
use bucket_types::BucketId;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// An in-memory [`StakingStore`].
///
/// Can be switched into a failing mode, or given a budget of writes after
/// which writes fail, to exercise backend errors.
pub struct NullStakingStore {
    buckets: Mutex<BTreeMap<BucketId, Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    failing: AtomicBool,
    write_budget: Mutex<Option<usize>>,
}

impl NullStakingStore {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(BTreeMap::new()),
            meta: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            write_budget: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with a backend error. Turning it off
    /// also clears any write budget.
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
        *self.write_budget.lock().unwrap() = None;
    }

    /// Let `writes` more writes succeed, then fail every write after them.
    pub fn fail_after(&self, writes: usize) {
        *self.write_budget.lock().unwrap() = Some(writes);
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store set to fail".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.check()?;
        let mut budget = self.write_budget.lock().unwrap();
        match budget.as_mut() {
            Some(0) => Err(StoreError::Backend("null store write budget exhausted".into())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Default for NullStakingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StakingStore for NullStakingStore {
    fn get_bucket(&self, id: BucketId) -> Result<Option<Vec<u8>>, StoreError> {
        self.check()?;
        Ok(self.buckets.lock().unwrap().get(&id).cloned())
    }

    fn put_bucket(&self, id: BucketId, record: &[u8]) -> Result<(), StoreError> {
        self.check_write()?;
        self.buckets.lock().unwrap().insert(id, record.to_vec());
        Ok(())
    }

    fn delete_bucket(&self, id: BucketId) -> Result<(), StoreError> {
        self.check_write()?;
        self.buckets
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("bucket {id}")))
    }

    fn iter_buckets(&self) -> Result<Vec<(BucketId, Vec<u8>)>, StoreError> {
        self.check()?;
        Ok(self
            .buckets
            .lock()
            .unwrap()
            .iter()
            .map(|(id, bytes)| (*id, bytes.clone()))
            .collect())
    }

    fn clear_buckets(&self) -> Result<(), StoreError> {
        self.check_write()?;
        self.buckets.lock().unwrap().clear();
        Ok(())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.check()?;
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.check_write()?;
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
