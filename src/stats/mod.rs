//! Statistics for hubs
//!
//! Snapshots are taken under the hub lock, so every field in one snapshot is
//! mutually consistent.

pub mod metrics;

pub use metrics::HubStats;
