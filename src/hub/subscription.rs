//! Subscriber cursor into a hub
//!
//! A subscription only owns its read position. Everything it reads or retires
//! lives in the hub, so each call takes the hub lock once and works against
//! the current counters.
//!
//! ```text
//!   Active ──unsubscribe() / drop──▶ Unsubscribed (terminal)
//! ```

use std::sync::Arc;

use super::handle::{Hub, Shared};

/// One subscriber's view of a hub
///
/// Sees every value published after `Hub::subscribe` returned, in publish
/// order, unless a `slide` removed it first. Dropping a subscription
/// unsubscribes it.
pub struct Subscription<A: Clone> {
    shared: Arc<Shared<A>>,

    /// Next index to read; may lag behind the hub's retirement boundary
    cursor: u64,

    unsubscribed: bool,
}

impl<A: Clone> Subscription<A> {
    pub(super) fn new(shared: Arc<Shared<A>>, cursor: u64) -> Self {
        Self {
            shared,
            cursor,
            unsubscribed: false,
        }
    }

    /// Whether there is nothing left to read
    ///
    /// Always true once unsubscribed.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of values available to this subscription
    pub fn size(&self) -> usize {
        if self.unsubscribed {
            return 0;
        }
        self.shared.store.lock().cursor_size(self.cursor)
    }

    /// Take the next value, if any
    pub fn poll(&mut self) -> Option<A> {
        if self.unsubscribed {
            return None;
        }
        self.shared.store.lock().poll(&mut self.cursor)
    }

    /// Take the next value, or `default` if there is none
    pub fn poll_or(&mut self, default: A) -> A {
        self.poll().unwrap_or(default)
    }

    /// Take up to `max` values in publish order
    pub fn poll_up_to(&mut self, max: usize) -> Vec<A> {
        if self.unsubscribed {
            return Vec::new();
        }
        self.shared.store.lock().poll_up_to(&mut self.cursor, max)
    }

    /// Stop receiving values
    ///
    /// Every value this subscription had not read yet is released as if it had
    /// been polled, so it no longer holds up the hub's capacity. Calling this
    /// again does nothing.
    pub fn unsubscribe(&mut self) {
        if self.unsubscribed {
            return;
        }
        self.unsubscribed = true;

        let mut store = self.shared.store.lock();
        let released = store.unsubscribe(&mut self.cursor);

        tracing::trace!(
            kind = %self.shared.kind,
            subscribers = store.subscriber_count(),
            released = released,
            "Subscriber removed"
        );
    }

    /// Whether `unsubscribe` has been called
    pub fn is_unsubscribed(&self) -> bool {
        self.unsubscribed
    }

    /// Handle to the hub this subscription reads from
    pub fn hub(&self) -> Hub<A> {
        Hub::from_shared(Arc::clone(&self.shared))
    }
}

impl<A: Clone> Drop for Subscription<A> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl<A: Clone> std::fmt::Debug for Subscription<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.shared.kind)
            .field("cursor", &self.cursor)
            .field("unsubscribed", &self.unsubscribed)
            .finish()
    }
}
