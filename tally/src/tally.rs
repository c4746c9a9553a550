//! Sparse `(delegate, type) → {locked, unlocked}` counts.

use bucket_registry::TypeIndex;
use bucket_types::{DelegateId, LockState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Locked and unlocked bucket counts for one `(delegate, type)` pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cell {
    locked: u64,
    unlocked: u64,
}

impl Cell {
    fn slot(&mut self, state: LockState) -> &mut u64 {
        match state {
            LockState::Locked => &mut self.locked,
            LockState::Unlocked => &mut self.unlocked,
        }
    }

    fn get(&self, state: LockState) -> u64 {
        match state {
            LockState::Locked => self.locked,
            LockState::Unlocked => self.unlocked,
        }
    }

    fn is_empty(&self) -> bool {
        self.locked == 0 && self.unlocked == 0
    }
}

/// One delegate's votes, indexed by bucket-type index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyRow {
    pub locked: Vec<u64>,
    pub unlocked: Vec<u64>,
}

/// Bucket counts per delegate, bucket type and lock state.
///
/// Every change goes through [`increment`](Self::increment),
/// [`decrement`](Self::decrement), [`shift`](Self::shift) or
/// [`retype`](Self::retype). Decrementing an empty cell means the caller lost
/// track of a bucket; that is a bug, so it panics rather than returning an
/// error.
#[derive(Clone, Debug, Default)]
pub struct VoteTally {
    cells: HashMap<(DelegateId, TypeIndex), Cell>,
    total_locked: u64,
    total_unlocked: u64,
}

impl VoteTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more bucket at `(delegate, index, state)`.
    pub fn increment(&mut self, delegate: &DelegateId, index: TypeIndex, state: LockState) {
        let cell = self.cells.entry((*delegate, index)).or_default();
        *cell.slot(state) += 1;
        *self.total_slot(state) += 1;
    }

    /// Count one fewer bucket at `(delegate, index, state)`.
    ///
    /// # Panics
    /// Panics if the cell is already zero.
    pub fn decrement(&mut self, delegate: &DelegateId, index: TypeIndex, state: LockState) {
        let key = (*delegate, index);
        let cell = match self.cells.get_mut(&key) {
            Some(cell) if cell.get(state) > 0 => cell,
            _ => panic!("vote tally underflow: delegate {delegate} type {index} {state:?}"),
        };
        *cell.slot(state) -= 1;
        if cell.is_empty() {
            self.cells.remove(&key);
        }
        *self.total_slot(state) -= 1;
    }

    /// Move one bucket between lock states, possibly changing its type.
    pub fn shift(
        &mut self,
        delegate: &DelegateId,
        from: (TypeIndex, LockState),
        to: (TypeIndex, LockState),
    ) {
        if from == to {
            return;
        }
        self.decrement(delegate, from.0, from.1);
        self.increment(delegate, to.0, to.1);
    }

    /// Move one bucket between types without changing its lock state.
    pub fn retype(
        &mut self,
        delegate: &DelegateId,
        from: TypeIndex,
        to: TypeIndex,
        state: LockState,
    ) {
        self.shift(delegate, (from, state), (to, state));
    }

    /// Move one bucket from one delegate to another.
    pub fn redelegate(
        &mut self,
        from: &DelegateId,
        to: &DelegateId,
        index: TypeIndex,
        state: LockState,
    ) {
        if from == to {
            return;
        }
        self.decrement(from, index, state);
        self.increment(to, index, state);
    }

    /// Count at a single `(delegate, index, state)`.
    pub fn count(&self, delegate: &DelegateId, index: TypeIndex, state: LockState) -> u64 {
        self.cells
            .get(&(*delegate, index))
            .map(|c| c.get(state))
            .unwrap_or(0)
    }

    /// One row per delegate, each `type_count` wide.
    pub fn query(&self, delegates: &[DelegateId], type_count: usize) -> Vec<TallyRow> {
        delegates
            .iter()
            .map(|d| {
                let mut row = TallyRow {
                    locked: vec![0; type_count],
                    unlocked: vec![0; type_count],
                };
                for index in 0..type_count {
                    if let Some(cell) = self.cells.get(&(*d, index)) {
                        row.locked[index] = cell.locked;
                        row.unlocked[index] = cell.unlocked;
                    }
                }
                row
            })
            .collect()
    }

    /// Counts for a single lock state, one row per delegate.
    pub fn votes(
        &self,
        delegates: &[DelegateId],
        type_count: usize,
        state: LockState,
    ) -> Vec<Vec<u64>> {
        self.query(delegates, type_count)
            .into_iter()
            .map(|row| match state {
                LockState::Locked => row.locked,
                LockState::Unlocked => row.unlocked,
            })
            .collect()
    }

    /// Total buckets counted in `state` across all delegates and types.
    pub fn total(&self, state: LockState) -> u64 {
        match state {
            LockState::Locked => self.total_locked,
            LockState::Unlocked => self.total_unlocked,
        }
    }

    /// Number of non-empty `(delegate, type)` cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rebuild from a full bucket iterator.
    ///
    /// Called once when state is restored from storage. Each item yields the
    /// `(delegate, type index, lock state)` of one contributing bucket.
    pub fn rebuild(&mut self, buckets: impl Iterator<Item = (DelegateId, TypeIndex, LockState)>) {
        self.cells.clear();
        self.total_locked = 0;
        self.total_unlocked = 0;
        for (delegate, index, state) in buckets {
            self.increment(&delegate, index, state);
        }
    }

    fn total_slot(&mut self, state: LockState) -> &mut u64 {
        match state {
            LockState::Locked => &mut self.total_locked,
            LockState::Unlocked => &mut self.total_unlocked,
        }
    }
}
