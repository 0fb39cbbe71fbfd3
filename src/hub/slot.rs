//! Slot protocol
//!
//! Every published value lives in exactly one slot together with the number of
//! subscribers that still have to read it. The count is fixed at publish time
//! from the hub's subscriber count; subscribers that join later never hold a
//! reference to it. Each read (or unsubscribe) releases one reference and the
//! reader that releases the last one takes the value out of the slot.
//!
//! Retirement is always in publish order: any subscriber still holding slot
//! `i + 1` was already subscribed when slot `i` was published, and reads in
//! order, so slot `i` is freed first.

/// One published value and its pending reader count
#[derive(Debug)]
pub(crate) struct Slot<A> {
    value: Option<A>,
    refs: usize,
}

impl<A> Slot<A> {
    /// An unoccupied slot
    pub(crate) const fn vacant() -> Self {
        Self {
            value: None,
            refs: 0,
        }
    }

    /// An occupied slot awaiting `refs` readers
    pub(crate) fn occupied(value: A, refs: usize) -> Self {
        Self {
            value: Some(value),
            refs,
        }
    }

    /// Overwrite this slot with a freshly published value
    pub(crate) fn fill(&mut self, value: A, refs: usize) {
        self.value = Some(value);
        self.refs = refs;
    }

    /// Release one reference without reading the value
    ///
    /// Returns true if this freed the slot.
    pub(crate) fn release(&mut self) -> bool {
        debug_assert!(self.refs > 0, "released a slot with no pending readers");
        self.refs = self.refs.saturating_sub(1);
        if self.refs == 0 {
            self.value = None;
            true
        } else {
            false
        }
    }

    /// Drop the value regardless of pending readers
    pub(crate) fn clear(&mut self) {
        self.value = None;
        self.refs = 0;
    }

    /// Whether every reader has released this slot
    pub(crate) fn is_free(&self) -> bool {
        self.refs == 0
    }

    #[cfg(test)]
    pub(crate) fn refs(&self) -> usize {
        self.refs
    }

    #[cfg(test)]
    pub(crate) fn value(&self) -> Option<&A> {
        self.value.as_ref()
    }
}

impl<A: Clone> Slot<A> {
    /// Read the value and release one reference
    ///
    /// The last reader receives the stored value by move; earlier readers get
    /// a clone.
    pub(crate) fn read(&mut self) -> Option<A> {
        debug_assert!(self.refs > 0, "read a slot with no pending readers");
        self.refs = self.refs.saturating_sub(1);
        if self.refs == 0 {
            self.value.take()
        } else {
            self.value.clone()
        }
    }
}

impl<A> Default for Slot<A> {
    fn default() -> Self {
        Self::vacant()
    }
}

/// Hub-owned counters
///
/// Subscriptions never cache these; they read them under the hub lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Counters {
    /// Number of values ever stored
    pub publisher_index: u64,
    /// Number of values ever retired (read by everyone, released or slid)
    pub subscribers_index: u64,
    /// Number of live subscriptions
    pub subscriber_count: usize,
    /// Number of values retired by `slide`
    pub evicted: u64,
}

impl Counters {
    /// Values stored but not yet retired
    pub(crate) fn outstanding(&self) -> usize {
        usize::try_from(self.publisher_index - self.subscribers_index).unwrap_or(usize::MAX)
    }
}
