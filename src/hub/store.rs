//! Backing store contract
//!
//! Each hub variant implements the three storage primitives (`put`,
//! `slot_mut`, `retire`). Everything else, including the bulk operations and
//! the subscriber cursor logic, is shared through the provided methods so that
//! the four variants only differ in how an index maps onto storage.
//!
//! Cursors are plain `u64` positions owned by each `Subscription`. They are
//! clamped forward to `subscribers_index` before every use, which skips slots
//! that `slide` retired while the subscriber was behind.

use super::slot::{Counters, Slot};

/// Storage and bookkeeping for one hub
pub(crate) trait Store<A: Clone>: Send {
    /// Maximum number of outstanding values (`usize::MAX` if unbounded)
    fn capacity(&self) -> usize;

    fn counters(&self) -> &Counters;

    fn counters_mut(&mut self) -> &mut Counters;

    /// Store a value in the slot for `index`
    ///
    /// `index` is always the current publisher index.
    fn put(&mut self, index: u64, value: A, refs: usize);

    /// Slot holding `index`, which must be outstanding
    fn slot_mut(&mut self, index: u64) -> &mut Slot<A>;

    /// Reclaim the oldest slot after it has been freed
    fn retire(&mut self, _index: u64) {}

    fn size(&self) -> usize {
        self.counters().outstanding()
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn is_full(&self) -> bool {
        self.size() >= self.capacity()
    }

    fn subscriber_count(&self) -> usize {
        self.counters().subscriber_count
    }

    /// Publish one value
    ///
    /// Returns false if the hub is full. With no subscribers the value is
    /// dropped and the publish still succeeds.
    fn publish(&mut self, value: A) -> bool {
        if self.is_full() {
            return false;
        }
        let refs = self.counters().subscriber_count;
        if refs != 0 {
            self.push(value, refs);
        }
        true
    }

    /// Publish as many values as fit, returning the rest in order
    ///
    /// With no subscribers every value is accepted and dropped, as `publish`
    /// does one at a time.
    fn publish_all(&mut self, values: &mut dyn Iterator<Item = A>) -> Vec<A> {
        let refs = self.counters().subscriber_count;
        if refs == 0 {
            values.for_each(drop);
            return Vec::new();
        }

        let available = self.capacity().saturating_sub(self.size());
        for value in (&mut *values).take(available) {
            self.push(value, refs);
        }

        values.collect()
    }

    /// Publish one value, evicting the oldest values while the hub is full
    ///
    /// Returns the number of evicted values.
    fn publish_sliding(&mut self, value: A) -> usize {
        let mut evicted = 0;
        while self.is_full() {
            self.slide();
            evicted += 1;
        }
        let accepted = self.publish(value);
        debug_assert!(accepted);
        evicted
    }

    /// Force-free the oldest slot, whatever its pending readers
    fn slide(&mut self) {
        if self.is_empty() {
            return;
        }
        let index = self.counters().subscribers_index;
        self.slot_mut(index).clear();
        self.retire(index);

        let counters = self.counters_mut();
        counters.subscribers_index += 1;
        counters.evicted += 1;
    }

    /// Register a subscriber, returning its starting cursor
    fn subscribe(&mut self) -> u64 {
        let counters = self.counters_mut();
        counters.subscriber_count += 1;
        counters.publisher_index
    }

    /// Values still readable from `cursor`
    fn cursor_size(&self, cursor: u64) -> usize {
        let counters = self.counters();
        let from = cursor.max(counters.subscribers_index);
        usize::try_from(counters.publisher_index - from).unwrap_or(usize::MAX)
    }

    /// Read the next value at `cursor`, advancing it
    fn poll(&mut self, cursor: &mut u64) -> Option<A> {
        self.clamp(cursor);
        if *cursor == self.counters().publisher_index {
            return None;
        }

        let index = *cursor;
        let slot = self.slot_mut(index);
        let value = slot.read();
        if slot.is_free() {
            self.free_oldest(index);
        }
        *cursor += 1;

        debug_assert!(value.is_some(), "outstanding slot {} was empty", index);
        value
    }

    /// Read up to `max` values at `cursor`
    fn poll_up_to(&mut self, cursor: &mut u64, max: usize) -> Vec<A> {
        let count = max.min(self.cursor_size(*cursor));
        let mut values = Vec::with_capacity(count);

        for _ in 0..count {
            if let Some(value) = self.poll(cursor) {
                values.push(value);
            }
        }

        values
    }

    /// Release every slot still pending at `cursor` and drop the subscriber
    ///
    /// Returns the number of released slots.
    fn unsubscribe(&mut self, cursor: &mut u64) -> usize {
        self.clamp(cursor);
        let end = self.counters().publisher_index;
        let mut released = 0;

        while *cursor != end {
            let index = *cursor;
            if self.slot_mut(index).release() {
                self.free_oldest(index);
            }
            *cursor += 1;
            released += 1;
        }

        let counters = self.counters_mut();
        counters.subscriber_count = counters.subscriber_count.saturating_sub(1);
        released
    }

    fn push(&mut self, value: A, refs: usize) {
        let index = self.counters().publisher_index;
        self.put(index, value, refs);
        self.counters_mut().publisher_index += 1;
    }

    fn clamp(&self, cursor: &mut u64) {
        *cursor = (*cursor).max(self.counters().subscribers_index);
    }

    fn free_oldest(&mut self, index: u64) {
        debug_assert_eq!(
            index,
            self.counters().subscribers_index,
            "slots must retire in publish order"
        );
        self.retire(index);
        self.counters_mut().subscribers_index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::super::ring::{BoundedArbitrary, BoundedPow2};
    use super::super::single::BoundedSingle;
    use super::super::unbounded::Unbounded;
    use super::*;

    fn bounded_stores(capacity: usize) -> Vec<Box<dyn Store<i32>>> {
        let mut stores: Vec<Box<dyn Store<i32>>> = Vec::new();
        stores.push(Box::new(BoundedArbitrary::new(capacity)));
        if capacity == 1 {
            stores.push(Box::new(BoundedSingle::new()));
        }
        if capacity.is_power_of_two() {
            stores.push(Box::new(BoundedPow2::new(capacity)));
        }
        stores
    }

    fn all_stores(capacity: usize) -> Vec<Box<dyn Store<i32>>> {
        let mut stores = bounded_stores(capacity);
        stores.push(Box::new(Unbounded::new()));
        stores
    }

    fn drain(store: &mut dyn Store<i32>, cursor: &mut u64) -> Vec<i32> {
        store.poll_up_to(cursor, usize::MAX)
    }

    #[test]
    fn test_broadcast_to_every_subscriber() {
        for capacity in [1, 4, 6] {
            for mut store in all_stores(capacity) {
                let mut cursors: Vec<u64> = (0..3).map(|_| store.subscribe()).collect();
                let values: Vec<i32> = (0..capacity as i32).collect();

                for &value in &values {
                    assert!(store.publish(value));
                }
                for cursor in cursors.iter_mut() {
                    assert_eq!(drain(store.as_mut(), cursor), values);
                }
                assert!(store.is_empty());
            }
        }
    }

    #[test]
    fn test_late_join_excludes_earlier_values() {
        for mut store in all_stores(8) {
            let mut early = store.subscribe();
            store.publish(1);
            store.publish(2);
            let mut late = store.subscribe();
            store.publish(3);

            assert_eq!(drain(store.as_mut(), &mut early), vec![1, 2, 3]);
            assert_eq!(drain(store.as_mut(), &mut late), vec![3]);
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_capacity_bound() {
        for capacity in [1, 2, 3, 4, 7, 8] {
            for mut store in bounded_stores(capacity) {
                let mut a = store.subscribe();
                let mut b = store.subscribe();

                for i in 0..capacity as i32 {
                    assert!(store.publish(i));
                }
                assert!(store.is_full());
                assert!(!store.publish(-1));
                assert_eq!(store.size(), capacity);

                // One reader is not enough to retire the oldest slot
                assert_eq!(store.poll(&mut a), Some(0));
                assert!(store.is_full());
                assert!(!store.publish(-1));

                assert_eq!(store.poll(&mut b), Some(0));
                assert!(!store.is_full());
                assert!(store.publish(100));
                assert!(store.is_full());
            }
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_discarded() {
        for mut store in all_stores(4) {
            assert!(store.publish(1));
            assert!(store.is_empty());
            assert_eq!(store.counters().publisher_index, 0);

            let mut cursor = store.subscribe();
            assert_eq!(store.poll(&mut cursor), None);
        }
    }

    #[test]
    fn test_publish_all_returns_remainder() {
        for mut store in bounded_stores(4) {
            let mut cursor = store.subscribe();
            store.publish(0);

            let rest = store.publish_all(&mut (1..10));
            assert_eq!(rest, (4..10).collect::<Vec<_>>());
            assert!(store.is_full());
            assert_eq!(drain(store.as_mut(), &mut cursor), vec![0, 1, 2, 3]);

            assert!(store.publish_all(&mut std::iter::empty::<i32>()).is_empty());
        }
    }

    #[test]
    fn test_publish_all_on_full_store_returns_everything() {
        for mut store in bounded_stores(2) {
            let _cursor = store.subscribe();
            store.publish_all(&mut (0..2));
            assert_eq!(store.publish_all(&mut (5..8)), vec![5, 6, 7]);
        }
    }

    #[test]
    fn test_publish_all_unbounded_accepts_everything() {
        let mut store: Unbounded<i32> = Unbounded::new();
        let mut cursor = store.subscribe();
        assert!(store.publish_all(&mut (0..1000)).is_empty());
        assert_eq!(store.size(), 1000);
        assert_eq!(store.cursor_size(cursor), 1000);
        assert_eq!(store.poll_up_to(&mut cursor, 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_publish_all_without_subscribers() {
        for mut store in bounded_stores(4) {
            assert!(store.publish_all(&mut (0..6)).is_empty());
            assert!(store.is_empty());
            assert!(!store.is_full());
        }
        let mut store: Unbounded<i32> = Unbounded::new();
        assert!(store.publish_all(&mut (0..6)).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_retirement_independent_of_order() {
        for mut store in all_stores(4) {
            let mut a = store.subscribe();
            let mut b = store.subscribe();
            let mut c = store.subscribe();
            store.publish(1);
            store.publish(2);

            // b reads both, a unsubscribes, c reads one: slot 1 freed by the third action
            assert_eq!(store.poll_up_to(&mut b, 2), vec![1, 2]);
            assert_eq!(store.size(), 2);
            assert_eq!(store.unsubscribe(&mut a), 2);
            assert_eq!(store.size(), 2);
            assert_eq!(store.poll(&mut c), Some(1));
            assert_eq!(store.size(), 1);
            assert_eq!(store.poll(&mut c), Some(2));
            assert!(store.is_empty());
            assert_eq!(store.subscriber_count(), 2);
        }
    }

    #[test]
    fn test_slide_drops_oldest_for_everyone() {
        for mut store in all_stores(4) {
            let mut a = store.subscribe();
            let mut b = store.subscribe();
            store.publish_all(&mut (1..=3));

            assert_eq!(store.poll(&mut a), Some(1));
            store.slide();
            assert_eq!(store.size(), 2);
            assert_eq!(store.counters().subscribers_index, 1);
            assert_eq!(store.counters().evicted, 1);

            // b never read 1; its cursor is clamped past the slid slot
            assert_eq!(store.cursor_size(b), 2);
            assert_eq!(drain(store.as_mut(), &mut b), vec![2, 3]);
            assert_eq!(drain(store.as_mut(), &mut a), vec![2, 3]);
            assert!(store.is_empty());

            store.slide();
            assert_eq!(store.counters().evicted, 1);
        }
    }

    #[test]
    fn test_unsubscribe_releases_pending_slots() {
        for mut store in all_stores(4) {
            let mut a = store.subscribe();
            let mut b = store.subscribe();
            store.publish_all(&mut (0..4));
            store.slide();

            assert_eq!(store.poll(&mut a), Some(1));
            assert_eq!(store.unsubscribe(&mut b), 3);
            assert_eq!(store.size(), 2);
            assert_eq!(store.unsubscribe(&mut a), 2);
            assert!(store.is_empty());
            assert_eq!(store.subscriber_count(), 0);
            assert_eq!(store.counters().subscribers_index, 4);
        }
    }

    #[test]
    fn test_publish_sliding_evicts_when_full() {
        for capacity in [1, 3, 4] {
            for mut store in bounded_stores(capacity) {
                let mut cursor = store.subscribe();
                for i in 0..capacity as i32 {
                    assert_eq!(store.publish_sliding(i), 0);
                }
                assert_eq!(store.publish_sliding(99), 1);
                assert!(store.is_full());

                let mut expected: Vec<i32> = (1..capacity as i32).collect();
                expected.push(99);
                assert_eq!(drain(store.as_mut(), &mut cursor), expected);
            }
        }
    }

    #[test]
    fn test_ring_wraps_around() {
        for mut store in bounded_stores(3) {
            let mut cursor = store.subscribe();
            let mut seen = Vec::new();
            for round in 0..10 {
                let base = round * 3;
                assert!(store.publish_all(&mut (base..base + 3)).is_empty());
                seen.extend(store.poll_up_to(&mut cursor, 2));
                seen.extend(store.poll_up_to(&mut cursor, 2));
            }
            assert_eq!(seen, (0..30).collect::<Vec<_>>());
            assert_eq!(store.counters().publisher_index, 30);
        }
    }

    #[test]
    fn test_poll_up_to_zero() {
        for mut store in all_stores(2) {
            let mut cursor = store.subscribe();
            store.publish(1);
            assert!(store.poll_up_to(&mut cursor, 0).is_empty());
            assert_eq!(store.cursor_size(cursor), 1);
        }
    }
}
