//! Error types for locator system

use thiserror::Error;

/// Locator error enumeration
///
/// These are the failures an [`ElementCounter`](crate::ElementCounter) may
/// report for a single strategy. The resolver downgrades all of them to a
/// zero count.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// Element went away while being inspected (re-render, navigation)
    #[error("Element detached: {0}")]
    Detached(String),

    /// Strategy cannot be evaluated (malformed selector, unsupported role)
    #[error("Invalid strategy '{strategy}': {reason}")]
    InvalidStrategy { strategy: String, reason: String },

    /// Driver communication error
    #[error("Driver error: {0}")]
    Driver(String),

    /// Lookup took longer than the driver allows
    #[error("Lookup timeout: {0}")]
    Timeout(String),
}

impl LocatorError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LocatorError::Detached(_) | LocatorError::Timeout(_) | LocatorError::Driver(_)
        )
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            LocatorError::InvalidStrategy { .. } => 2,
            LocatorError::Driver(_) | LocatorError::Timeout(_) => 1,
            LocatorError::Detached(_) => 0,
        }
    }
}
