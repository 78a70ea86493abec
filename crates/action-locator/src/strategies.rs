//! Element counting capability consumed by the resolver

use crate::{errors::LocatorError, types::SelectionStrategy};
use async_trait::async_trait;
use std::sync::Arc;

/// Counts elements matching a strategy against the current page state.
///
/// Implemented by whatever drives the browser. Implementations must be
/// read-only observations.
#[async_trait]
pub trait ElementCounter: Send + Sync {
    async fn count(&self, strategy: &SelectionStrategy) -> Result<usize, LocatorError>;
}

#[async_trait]
impl<T: ElementCounter + ?Sized> ElementCounter for Arc<T> {
    async fn count(&self, strategy: &SelectionStrategy) -> Result<usize, LocatorError> {
        (**self).count(strategy).await
    }
}
