//! Error types for outcome polling

use thiserror::Error;

/// Poller error enumeration
///
/// A poll that runs to completion never errors: timeouts are a
/// [`PollResult`](crate::PollResult). Only external interruption does.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Cancellation token fired before an outcome was classified
    #[error("Poll interrupted: {0}")]
    Interrupted(String),
}

impl GateError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            GateError::Interrupted(_) => 1,
        }
    }
}
