//! Page driver capability consumed by the flows

use action_locator::{ElementCounter, SelectionStrategy};
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a page driver implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// Navigation did not complete
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Click or fill could not be performed on the target
    #[error("{action} on {target} failed: {reason}")]
    Interaction {
        action: String,
        target: String,
        reason: String,
    },

    /// Target element left the DOM
    #[error("Element detached: {0}")]
    Detached(String),

    /// Browser or transport failure
    #[error("Driver backend error: {0}")]
    Backend(String),
}

impl DriverError {
    pub fn interaction(
        action: impl Into<String>,
        target: &SelectionStrategy,
        reason: impl Into<String>,
    ) -> Self {
        DriverError::Interaction {
            action: action.into(),
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DriverError::Detached(_) | DriverError::Interaction { .. }
        )
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            DriverError::Detached(_) => 1,
            DriverError::Interaction { .. } => 2,
            DriverError::Navigation { .. } => 2,
            DriverError::Backend(_) => 3,
        }
    }
}

/// Browser page as seen by the flows
///
/// Every query targets the elements matched by one strategy. State queries
/// report on the first match; a strategy matching nothing is not visible
/// and not enabled.
#[async_trait]
pub trait PageDriver: ElementCounter {
    async fn is_visible(&self, target: &SelectionStrategy) -> Result<bool, DriverError>;

    async fn is_enabled(&self, target: &SelectionStrategy) -> Result<bool, DriverError>;

    /// Click the first element matched by `target`
    async fn click(&self, target: &SelectionStrategy) -> Result<(), DriverError>;

    /// Replace the value of the first input matched by `target`
    async fn fill(&self, target: &SelectionStrategy, value: &str) -> Result<(), DriverError>;

    /// Navigate to `path`, relative to the application base URL
    async fn goto(&self, path: &str) -> Result<(), DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;
}
