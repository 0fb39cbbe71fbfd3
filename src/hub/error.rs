//! Hub error types
//!
//! Construction is the only fallible step. Full and empty hubs are reported
//! through return values (`publish` returning `false`, `poll` returning
//! `None`), not through this type.

/// Error type for hub construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    /// Requested a bounded hub with a capacity of zero
    InvalidCapacity(usize),
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HubError::InvalidCapacity(capacity) => {
                write!(f, "Invalid hub capacity: {} (must be positive)", capacity)
            }
        }
    }
}

impl std::error::Error for HubError {}
