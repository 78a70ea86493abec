//! Fallback chain orchestration

use crate::{
    strategies::ElementCounter,
    types::{ResolvedLocator, SelectionStrategy, SelectorSpec, StrategySlot},
};
use tracing::{debug, warn};

/// Resolve a selector spec against the current page state.
///
/// Returns the primary if it matches anything, otherwise the first fallback
/// that does, otherwise the primary with count 0. Lookup errors count as
/// zero matches. One snapshot, no retries: callers compose this with the
/// outcome poller when they need to wait.
pub async fn resolve<C>(counter: &C, spec: &SelectorSpec) -> ResolvedLocator
where
    C: ElementCounter + ?Sized,
{
    for (slot, strategy) in spec.strategies() {
        let count = count_or_zero(counter, slot, strategy).await;
        if count > 0 {
            if slot != StrategySlot::Primary {
                debug!(%slot, %strategy, count, "primary matched nothing, using fallback");
            }
            return ResolvedLocator::new(strategy.clone(), slot, count);
        }
    }

    warn!(
        strategies = spec.len(),
        primary = %spec.primary,
        "no strategy matched, degrading to primary"
    );
    ResolvedLocator::new(spec.primary.clone(), StrategySlot::Primary, 0)
}

async fn count_or_zero<C>(counter: &C, slot: StrategySlot, strategy: &SelectionStrategy) -> usize
where
    C: ElementCounter + ?Sized,
{
    match counter.count(strategy).await {
        Ok(count) => count,
        Err(err) => {
            warn!(%slot, %strategy, error = %err, "strategy lookup failed, counting as no match");
            0
        }
    }
}
