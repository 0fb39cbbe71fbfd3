//! Hub handle and factory
//!
//! `Hub<A>` is the producer side. It is cheap to clone; every clone and every
//! subscription shares one backing store behind a single mutex, and each
//! operation holds that mutex for its whole duration.

use std::sync::Arc;

use parking_lot::Mutex;

use super::config::{Capacity, HubConfig, HubKind, OverflowPolicy};
use super::error::HubError;
use super::ring::{BoundedArbitrary, BoundedPow2};
use super::single::BoundedSingle;
use super::store::Store;
use super::subscription::Subscription;
use super::unbounded::Unbounded;
use crate::stats::HubStats;

/// State shared by a hub's handles and subscriptions
pub(super) struct Shared<A: Clone> {
    pub(super) config: HubConfig,
    pub(super) kind: HubKind,
    pub(super) store: Mutex<Box<dyn Store<A>>>,
}

/// Broadcast buffer delivering every published value to every subscription
///
/// Thread-safe: all operations take `&self` and are atomic with respect to
/// each other. None of them block beyond the short internal lock; a full hub is
/// reported by `publish` returning `false` and an exhausted subscription by
/// `poll` returning `None`.
pub struct Hub<A: Clone> {
    shared: Arc<Shared<A>>,
}

impl<A: Clone + Send + 'static> Hub<A> {
    /// Create a bounded hub
    ///
    /// A capacity of 1 selects the single-slot store, a power of two the
    /// bitmask ring and anything else the modulo ring. Fails if `capacity`
    /// is zero.
    pub fn bounded(capacity: usize) -> Result<Self, HubError> {
        Self::with_config(HubConfig::bounded(capacity))
    }

    /// Create an unbounded hub
    pub fn unbounded() -> Self {
        Self::build(HubConfig::unbounded(), HubKind::Unbounded)
    }

    /// Create a hub with custom configuration
    pub fn with_config(config: HubConfig) -> Result<Self, HubError> {
        match config.kind() {
            Ok(kind) => Ok(Self::build(config, kind)),
            Err(e) => {
                tracing::warn!(capacity = ?config.capacity, error = %e, "Hub rejected");
                Err(e)
            }
        }
    }

    fn build(config: HubConfig, kind: HubKind) -> Self {
        let capacity = match config.capacity {
            Capacity::Bounded(n) => n,
            Capacity::Unbounded => usize::MAX,
        };

        let store: Box<dyn Store<A>> = match kind {
            HubKind::BoundedSingle => Box::new(BoundedSingle::new()),
            HubKind::BoundedPow2 => Box::new(BoundedPow2::new(capacity)),
            HubKind::BoundedArbitrary => Box::new(BoundedArbitrary::new(capacity)),
            HubKind::Unbounded => Box::new(Unbounded::new()),
        };

        tracing::debug!(
            kind = %kind,
            capacity = capacity,
            overflow = ?config.overflow,
            "Hub created"
        );

        Self {
            shared: Arc::new(Shared {
                config,
                kind,
                store: Mutex::new(store),
            }),
        }
    }
}

impl<A: Clone> Hub<A> {
    pub(super) fn from_shared(shared: Arc<Shared<A>>) -> Self {
        Self { shared }
    }

    /// Get the hub configuration
    pub fn config(&self) -> &HubConfig {
        &self.shared.config
    }

    /// Backing store selected at construction
    pub fn kind(&self) -> HubKind {
        self.shared.kind
    }

    /// Maximum number of outstanding values (`usize::MAX` if unbounded)
    pub fn capacity(&self) -> usize {
        self.shared.store.lock().capacity()
    }

    /// Number of values published but not yet retired
    pub fn size(&self) -> usize {
        self.shared.store.lock().size()
    }

    /// Whether every published value has been retired
    pub fn is_empty(&self) -> bool {
        self.shared.store.lock().is_empty()
    }

    /// Whether `publish` would currently be refused
    pub fn is_full(&self) -> bool {
        self.shared.store.lock().is_full()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.shared.store.lock().subscriber_count()
    }

    /// Publish a value to every current subscriber
    ///
    /// Returns `false`, leaving the hub untouched, if it is full. If there are
    /// no subscribers the value is dropped and the call still returns `true`.
    pub fn publish(&self, value: A) -> bool {
        self.shared.store.lock().publish(value)
    }

    /// Publish as many values as fit
    ///
    /// Returns the values that did not fit, in their original order. Unbounded
    /// hubs accept everything, and so does any hub without subscribers.
    pub fn publish_all<I>(&self, values: I) -> Vec<A>
    where
        I: IntoIterator<Item = A>,
    {
        let mut values = values.into_iter();
        self.shared.store.lock().publish_all(&mut values)
    }

    /// Publish a value, evicting the oldest values first if the hub is full
    ///
    /// Returns how many values were evicted to make room.
    pub fn publish_sliding(&self, value: A) -> usize {
        self.shared.store.lock().publish_sliding(value)
    }

    /// Publish according to the configured overflow policy
    ///
    /// With [`OverflowPolicy::Slide`] this always succeeds.
    pub fn offer(&self, value: A) -> bool {
        match self.shared.config.overflow {
            OverflowPolicy::Reject => self.publish(value),
            OverflowPolicy::Slide => {
                self.publish_sliding(value);
                true
            }
        }
    }

    /// Publish many values according to the configured overflow policy
    ///
    /// Returns the rejected values; always empty with [`OverflowPolicy::Slide`].
    pub fn offer_all<I>(&self, values: I) -> Vec<A>
    where
        I: IntoIterator<Item = A>,
    {
        match self.shared.config.overflow {
            OverflowPolicy::Reject => self.publish_all(values),
            OverflowPolicy::Slide => {
                let mut store = self.shared.store.lock();
                for value in values {
                    store.publish_sliding(value);
                }
                Vec::new()
            }
        }
    }

    /// Drop the oldest outstanding value, even if some subscribers have not
    /// read it yet
    pub fn slide(&self) {
        self.shared.store.lock().slide();
    }

    /// Subscribe to values published from now on
    pub fn subscribe(&self) -> Subscription<A> {
        let cursor = {
            let mut store = self.shared.store.lock();
            let cursor = store.subscribe();

            tracing::trace!(
                kind = %self.shared.kind,
                subscribers = store.subscriber_count(),
                cursor = cursor,
                "Subscriber added"
            );

            cursor
        };

        Subscription::new(Arc::clone(&self.shared), cursor)
    }

    /// Get hub statistics
    pub fn stats(&self) -> HubStats {
        let store = self.shared.store.lock();
        let counters = store.counters();

        HubStats {
            kind: self.shared.kind,
            capacity: store.capacity(),
            size: store.size(),
            subscriber_count: counters.subscriber_count,
            published: counters.publisher_index,
            retired: counters.subscribers_index,
            evicted: counters.evicted,
        }
    }
}

impl<A: Clone> Clone for Hub<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A: Clone> std::fmt::Debug for Hub<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.shared.store.lock();
        f.debug_struct("Hub")
            .field("kind", &self.shared.kind)
            .field("capacity", &store.capacity())
            .field("size", &store.size())
            .field("subscribers", &store.subscriber_count())
            .finish()
    }
}
