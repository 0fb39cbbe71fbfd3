//! # fanout-hub
//!
//! In-process broadcast buffer: every value published to a [`Hub`] is
//! delivered, in order, to every [`Subscription`] that existed when it was
//! published.
//!
//! All operations are synchronous and never wait. A full hub is signalled by
//! [`Hub::publish`] returning `false`; an exhausted subscription by
//! [`Subscription::poll`] returning `None`. Retrying, parking or dropping is
//! left to the caller.
//!
//! ```
//! use fanout_hub::{Hub, HubConfig};
//!
//! // Drop the oldest values instead of refusing new ones
//! let hub = Hub::with_config(HubConfig::bounded(2).sliding()).unwrap();
//! let mut sub = hub.subscribe();
//!
//! for i in 0..5 {
//!     hub.offer(i);
//! }
//! assert_eq!(sub.poll_up_to(10), vec![3, 4]);
//! assert_eq!(hub.stats().evicted, 3);
//! ```

pub mod hub;
pub mod stats;

pub use hub::{
    Capacity, Hub, HubConfig, HubError, HubKind, OverflowPolicy, Subscription, DEFAULT_CAPACITY,
};
pub use stats::HubStats;
