//! Capacity-one backing store
//!
//! A degenerate ring with a single cell: every index maps to the same slot, so
//! there is no index arithmetic at all.

use super::slot::{Counters, Slot};
use super::store::Store;

/// Hub storage holding at most one value
#[derive(Debug)]
pub(crate) struct BoundedSingle<A> {
    slot: Slot<A>,
    counters: Counters,
}

impl<A> BoundedSingle<A> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Slot::vacant(),
            counters: Counters::default(),
        }
    }
}

impl<A: Clone + Send> Store<A> for BoundedSingle<A> {
    fn capacity(&self) -> usize {
        1
    }

    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    fn put(&mut self, _index: u64, value: A, refs: usize) {
        self.slot.fill(value, refs);
    }

    fn slot_mut(&mut self, _index: u64) -> &mut Slot<A> {
        &mut self.slot
    }
}
