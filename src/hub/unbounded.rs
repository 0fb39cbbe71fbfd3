//! Growable backing store
//!
//! Slots are appended at the back as values are published and popped from the
//! front as soon as they retire, so memory tracks the number of outstanding
//! values rather than the number ever published. The front slot always holds
//! `subscribers_index`.

use std::collections::VecDeque;

use super::slot::{Counters, Slot};
use super::store::Store;

/// Hub storage with no capacity limit
#[derive(Debug)]
pub(crate) struct Unbounded<A> {
    slots: VecDeque<Slot<A>>,
    counters: Counters,
}

impl<A> Unbounded<A> {
    pub(crate) fn new() -> Self {
        Self {
            slots: VecDeque::new(),
            counters: Counters::default(),
        }
    }

    fn position(&self, index: u64) -> usize {
        (index - self.counters.subscribers_index) as usize
    }
}

impl<A: Clone + Send> Store<A> for Unbounded<A> {
    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    fn put(&mut self, index: u64, value: A, refs: usize) {
        debug_assert_eq!(self.position(index), self.slots.len());
        self.slots.push_back(Slot::occupied(value, refs));
    }

    fn slot_mut(&mut self, index: u64) -> &mut Slot<A> {
        let position = self.position(index);
        &mut self.slots[position]
    }

    fn retire(&mut self, index: u64) {
        debug_assert_eq!(self.position(index), 0);
        self.slots.pop_front();

        if self.slots.is_empty() && self.slots.capacity() > SHRINK_THRESHOLD {
            self.slots.shrink_to(SHRINK_THRESHOLD);
        }
    }
}

/// Spare slot capacity kept after the store drains
const SHRINK_THRESHOLD: usize = 4096;
