//! Hub statistics snapshot

use crate::hub::HubKind;

/// Point-in-time view of a hub's counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubStats {
    /// Backing store in use
    pub kind: HubKind,
    /// Maximum outstanding values (`usize::MAX` if unbounded)
    pub capacity: usize,
    /// Values stored but not yet retired
    pub size: usize,
    /// Live subscriptions
    pub subscriber_count: usize,
    /// Values ever stored (publishes to zero subscribers are not counted)
    pub published: u64,
    /// Values ever retired, whether read by everyone or slid out
    pub retired: u64,
    /// Values retired by sliding before every subscriber read them
    pub evicted: u64,
}

impl HubStats {
    /// Whether the hub has a fixed capacity
    pub fn is_bounded(&self) -> bool {
        self.kind.is_bounded()
    }

    /// Whether no more values can be published without sliding
    pub fn is_full(&self) -> bool {
        self.size >= self.capacity
    }

    /// Get buffer utilization as a percentage
    ///
    /// Always 0 for unbounded hubs.
    pub fn utilization(&self) -> f32 {
        if self.is_bounded() && self.capacity > 0 {
            (self.size as f32 / self.capacity as f32) * 100.0
        } else {
            0.0
        }
    }

    /// Values retired because every subscriber consumed or released them
    pub fn consumed(&self) -> u64 {
        self.retired - self.evicted
    }
}
