//! Fixed-size ring backing stores
//!
//! Both bounded ring variants share one implementation and differ only in how
//! a monotonically increasing index is folded onto the slot array. The fold is
//! chosen at construction as a type parameter, so each variant's hot path is a
//! single mask or a single modulo with no branching on the variant.
//!
//! ```text
//!   subscribers_index            publisher_index
//!          │                            │
//!          ▼                            ▼
//!   ┌────┬────┬────┬────┬────┬────┬────┬────┐
//!   │ .. │ s3 │ s4 │ s5 │ s6 │ .. │ .. │ .. │   slots[index & mask]
//!   └────┴────┴────┴────┴────┴────┴────┴────┘   slots[index % capacity]
//!          └──── outstanding ───────┘
//! ```

use super::slot::{Counters, Slot};
use super::store::Store;

/// Maps a hub index onto a slot position
pub(crate) trait Fold: Send {
    fn new(capacity: usize) -> Self;

    fn fold(&self, index: u64) -> usize;
}

/// `index & (capacity - 1)`; capacity must be a power of two
#[derive(Debug)]
pub(crate) struct Mask(u64);

impl Fold for Mask {
    fn new(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Mask(capacity as u64 - 1)
    }

    #[inline]
    fn fold(&self, index: u64) -> usize {
        (index & self.0) as usize
    }
}

/// `index % capacity`
#[derive(Debug)]
pub(crate) struct Modulo(u64);

impl Fold for Modulo {
    fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Modulo(capacity as u64)
    }

    #[inline]
    fn fold(&self, index: u64) -> usize {
        (index % self.0) as usize
    }
}

/// Ring of pre-allocated slots
#[derive(Debug)]
pub(crate) struct Ring<A, F> {
    slots: Box<[Slot<A>]>,
    fold: F,
    counters: Counters,
}

/// Power-of-two ring with bitmask indexing
pub(crate) type BoundedPow2<A> = Ring<A, Mask>;

/// Ring of any positive capacity with modulo indexing
pub(crate) type BoundedArbitrary<A> = Ring<A, Modulo>;

impl<A, F: Fold> Ring<A, F> {
    pub(crate) fn new(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| Slot::vacant()).collect();

        Self {
            slots,
            fold: F::new(capacity),
            counters: Counters::default(),
        }
    }
}

impl<A: Clone + Send, F: Fold> Store<A> for Ring<A, F> {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn counters(&self) -> &Counters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    fn put(&mut self, index: u64, value: A, refs: usize) {
        let position = self.fold.fold(index);
        self.slots[position].fill(value, refs);
    }

    fn slot_mut(&mut self, index: u64) -> &mut Slot<A> {
        let position = self.fold.fold(index);
        &mut self.slots[position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_uses_full_capacity() {
        let mask = Mask::new(8);
        assert_eq!(mask.fold(0), 0);
        assert_eq!(mask.fold(7), 7);
        assert_eq!(mask.fold(8), 0);
        assert_eq!(mask.fold(13), 5);

        let store: BoundedPow2<i32> = Ring::new(8);
        assert_eq!(store.capacity(), 8);
    }

    #[test]
    fn test_modulo_fold() {
        let modulo = Modulo::new(5);
        assert_eq!(modulo.fold(4), 4);
        assert_eq!(modulo.fold(5), 0);
        assert_eq!(modulo.fold(12), 2);
    }

    #[test]
    fn test_pow2_holds_capacity_values() {
        let mut store: BoundedPow2<i32> = BoundedPow2::new(4);
        let mut cursor = store.subscribe();

        assert!(store.publish_all(&mut (1..=4)).is_empty());
        assert!(!store.publish(5));
        assert_eq!(store.poll_up_to(&mut cursor, 10), vec![1, 2, 3, 4]);
        assert!(store.publish(5));
        assert_eq!(store.poll(&mut cursor), Some(5));
    }

    #[test]
    fn test_slots_cleared_after_retirement() {
        let mut store: BoundedArbitrary<&str> = BoundedArbitrary::new(3);
        let mut a = store.subscribe();
        let mut b = store.subscribe();
        store.publish_all(&mut ["p", "q"].into_iter());

        assert_eq!(store.poll(&mut a), Some("p"));
        assert_eq!(store.slots[0].refs(), 1);
        assert_eq!(store.slots[0].value(), Some(&"p"));

        assert_eq!(store.poll(&mut b), Some("p"));
        assert!(store.slots[0].value().is_none());
        assert_eq!(store.slots[1].refs(), 2);
    }

    #[test]
    fn test_arbitrary_wraps_storage() {
        let mut store: BoundedArbitrary<i32> = BoundedArbitrary::new(3);
        let mut cursor = store.subscribe();

        for i in 0..3 {
            store.publish(i);
        }
        assert_eq!(store.poll_up_to(&mut cursor, 2), vec![0, 1]);
        store.publish(3);
        store.publish(4);
        assert!(store.is_full());

        // 3 and 4 reuse positions 0 and 1
        assert_eq!(store.slots[0].value(), Some(&3));
        assert_eq!(store.slots[1].value(), Some(&4));
        assert_eq!(store.poll_up_to(&mut cursor, 10), vec![2, 3, 4]);
    }
}
