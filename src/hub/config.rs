//! Hub configuration

use super::error::HubError;

/// Default capacity for bounded hubs
pub const DEFAULT_CAPACITY: usize = 1024;

/// Requested hub capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// At most this many unretired values
    Bounded(usize),
    /// No limit; `publish` never reports a full hub
    Unbounded,
}

/// What `Hub::offer` does when the hub is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Refuse the value and let the caller decide (default)
    #[default]
    Reject,
    /// Evict the oldest values until the new one fits
    Slide,
}

/// Backing store selected for a hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubKind {
    /// Capacity of exactly one
    BoundedSingle,
    /// Power-of-two capacity, bitmask indexing
    BoundedPow2,
    /// Any other positive capacity, modulo indexing
    BoundedArbitrary,
    /// Growable linked storage
    Unbounded,
}

impl HubKind {
    /// Select the backing store for a requested capacity
    ///
    /// Fails only for a bounded capacity of zero.
    pub fn for_capacity(capacity: Capacity) -> Result<Self, HubError> {
        match capacity {
            Capacity::Unbounded => Ok(HubKind::Unbounded),
            Capacity::Bounded(0) => Err(HubError::InvalidCapacity(0)),
            Capacity::Bounded(1) => Ok(HubKind::BoundedSingle),
            Capacity::Bounded(n) if n.is_power_of_two() => Ok(HubKind::BoundedPow2),
            Capacity::Bounded(_) => Ok(HubKind::BoundedArbitrary),
        }
    }

    /// Whether this kind has a fixed capacity
    pub fn is_bounded(&self) -> bool {
        !matches!(self, HubKind::Unbounded)
    }
}

impl std::fmt::Display for HubKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HubKind::BoundedSingle => "bounded-single",
            HubKind::BoundedPow2 => "bounded-pow2",
            HubKind::BoundedArbitrary => "bounded-arbitrary",
            HubKind::Unbounded => "unbounded",
        };
        f.write_str(name)
    }
}

/// Hub configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Maximum number of unretired values
    pub capacity: Capacity,

    /// Behavior of `offer` / `offer_all` on a full hub
    pub overflow: OverflowPolicy,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            capacity: Capacity::Bounded(DEFAULT_CAPACITY),
            overflow: OverflowPolicy::Reject,
        }
    }
}

impl HubConfig {
    /// Create a config for a bounded hub
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Capacity::Bounded(capacity),
            ..Default::default()
        }
    }

    /// Create a config for an unbounded hub
    pub fn unbounded() -> Self {
        Self {
            capacity: Capacity::Unbounded,
            ..Default::default()
        }
    }

    /// Set the capacity
    pub fn capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the overflow policy
    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    /// Evict the oldest values instead of rejecting new ones
    pub fn sliding(self) -> Self {
        self.overflow(OverflowPolicy::Slide)
    }

    /// Backing store this config selects
    pub fn kind(&self) -> Result<HubKind, HubError> {
        HubKind::for_capacity(self.capacity)
    }
}
