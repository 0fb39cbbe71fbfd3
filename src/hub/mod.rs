//! Broadcast hub with independent subscriber cursors
//!
//! A hub stores each published value once, tagged with the number of
//! subscribers that must still read it. Subscriptions read at their own pace
//! and the slot is freed by whichever reader releases it last. Capacity is
//! never silently exceeded: a full bounded hub refuses `publish`, and `slide`
//! is the explicit way to drop the oldest value instead.
//!
//! # Architecture
//!
//! ```text
//!                          Hub<A> (Arc, cloneable)
//!                     ┌─────────────────────────────┐
//!                     │ Mutex<Box<dyn Store<A>>>    │
//!                     │   counters {                │
//!                     │     publisher_index,        │
//!                     │     subscribers_index,      │
//!                     │     subscriber_count,       │
//!                     │   }                         │
//!                     │   slots: [Slot { value,     │
//!                     │                  refs }]    │
//!                     └──────────────┬──────────────┘
//!                                    │
//!         ┌──────────────────────────┼──────────────────────────┐
//!         │                          │                          │
//!         ▼                          ▼                          ▼
//!    [Producer]               [Subscription]             [Subscription]
//!    publish()                cursor, poll()             cursor, poll()
//!    publish_all()            unsubscribe()              unsubscribe()
//! ```
//!
//! # Backing stores
//!
//! Chosen once from the requested capacity:
//!
//! | capacity        | store              | index mapping        |
//! |-----------------|--------------------|----------------------|
//! | 1               | `BoundedSingle`    | none                 |
//! | power of two    | `BoundedPow2`      | `i & (capacity - 1)` |
//! | other, positive | `BoundedArbitrary` | `i % capacity`       |
//! | unbounded       | `Unbounded`        | deque, front popped  |
//!
//! # Example
//!
//! ```
//! use fanout_hub::Hub;
//!
//! let hub = Hub::bounded(4).unwrap();
//! let mut a = hub.subscribe();
//! let mut b = hub.subscribe();
//!
//! assert!(hub.publish("hello"));
//! assert_eq!(a.poll(), Some("hello"));
//! assert_eq!(b.poll(), Some("hello"));
//! assert!(hub.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod handle;
pub mod subscription;

mod ring;
mod single;
mod slot;
mod store;
mod unbounded;

pub use config::{Capacity, HubConfig, HubKind, OverflowPolicy, DEFAULT_CAPACITY};
pub use error::HubError;
pub use handle::Hub;
pub use subscription::Subscription;
