//! Nullable handle registry.

use bucket_engine::BucketOwnership;
use bucket_types::{Address, BucketId};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory holder lookup for bucket handles.
pub struct NullOwnership {
    holders: Mutex<HashMap<BucketId, Address>>,
}

impl NullOwnership {
    pub fn new() -> Self {
        Self {
            holders: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.holders.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.lock().unwrap().is_empty()
    }

    /// Handles held by `holder`, sorted.
    pub fn held_by(&self, holder: &Address) -> Vec<BucketId> {
        let mut ids: Vec<BucketId> = self
            .holders
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, h)| *h == holder)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

impl Default for NullOwnership {
    fn default() -> Self {
        Self::new()
    }
}

impl BucketOwnership for NullOwnership {
    fn holder_of(&self, id: BucketId) -> Option<Address> {
        self.holders.lock().unwrap().get(&id).cloned()
    }

    fn mint(&self, id: BucketId, holder: &Address) {
        self.holders.lock().unwrap().insert(id, holder.clone());
    }

    fn burn(&self, id: BucketId) {
        self.holders.lock().unwrap().remove(&id);
    }

    fn transfer(&self, id: BucketId, to: &Address) {
        if let Some(holder) = self.holders.lock().unwrap().get_mut(&id) {
            *holder = to.clone();
        }
    }
}
