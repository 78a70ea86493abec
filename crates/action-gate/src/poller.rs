//! Sweep-based outcome poller

use crate::{
    errors::GateError,
    probes::{Probe, ProbeSet},
};
use futures::stream::{FuturesUnordered, StreamExt};
use probegate_core_types::{Deadline, OutcomeClass, PollConfig, PollId, PollResult};
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of one sweep over the probe set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepVerdict {
    /// Probe at this index fired and decides the poll
    Fired(OutcomeClass, usize),

    /// Nothing fired
    Quiet,
}

/// Classified result of one poll plus how it was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub result: PollResult,

    /// Sweeps run, including the deciding one
    pub sweeps: u32,

    /// Time from poll start to classification
    pub elapsed: Duration,
}

/// Poll `probes` against `ctx` until one fires or the deadline passes.
///
/// Every sweep evaluates all probes concurrently. An error indicator that
/// fires decides the sweep at once. A success indicator decides it as soon
/// as every error indicator of the same sweep has settled false, so error
/// wins when both fire together and a slow success probe never delays a
/// fast one. Probe failures count as false for that sweep.
///
/// The deadline runs from the call. A sweep in flight at the deadline is
/// completed before `Timeout` is returned; at least one sweep always runs.
pub async fn poll<C>(ctx: &C, probes: &ProbeSet<C>, config: &PollConfig) -> PollResult
where
    C: ?Sized + Sync,
{
    poll_detailed(ctx, probes, config).await.result
}

/// Same as [`poll`], also reporting sweep count and latency.
pub async fn poll_detailed<C>(ctx: &C, probes: &ProbeSet<C>, config: &PollConfig) -> PollReport
where
    C: ?Sized + Sync,
{
    let poll_id = PollId::new();

    if probes.is_empty() {
        warn!(%poll_id, "poll called without probes, nothing can fire");
        return PollReport {
            result: PollResult::Timeout,
            sweeps: 0,
            elapsed: Duration::ZERO,
        };
    }
    if let Err(err) = config.validate() {
        warn!(%poll_id, error = %err, "tolerating out-of-range poll timing");
    }

    let deadline = Deadline::start(config.timeout());
    let interval = config.effective_interval();
    let probe_budget = config.probe_timeout();
    let mut sweeps: u32 = 0;

    debug!(
        %poll_id,
        probes = probes.len(),
        error_probes = probes.error_count(),
        timeout_ms = config.timeout_ms,
        interval_ms = interval.as_millis() as u64,
        "starting poll"
    );

    loop {
        sweeps += 1;

        if let SweepVerdict::Fired(class, idx) = sweep(ctx, probes, probe_budget).await {
            let label = probes.get(idx).map(Probe::label).unwrap_or_default();
            info!(
                %poll_id,
                outcome = class.name(),
                probe = label,
                sweep = sweeps,
                elapsed_ms = deadline.elapsed().as_millis() as u64,
                "outcome detected"
            );
            return PollReport {
                result: PollResult::fired(class, label),
                sweeps,
                elapsed: deadline.elapsed(),
            };
        }

        if deadline.is_expired() {
            info!(
                %poll_id,
                sweeps,
                elapsed_ms = deadline.elapsed().as_millis() as u64,
                timeout_ms = config.timeout_ms,
                "no outcome before deadline"
            );
            return PollReport {
                result: PollResult::Timeout,
                sweeps,
                elapsed: deadline.elapsed(),
            };
        }

        debug!(%poll_id, sweep = sweeps, "sweep quiet");
        sleep(deadline.next_pause(interval)).await;
    }
}

/// Same as [`poll`], but gives up with [`GateError::Interrupted`] once
/// `cancel` fires.
pub async fn poll_until_cancelled<C>(
    ctx: &C,
    probes: &ProbeSet<C>,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<PollResult, GateError>
where
    C: ?Sized + Sync,
{
    let started = Instant::now();

    tokio::select! {
        biased;

        _ = cancel.cancelled() => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            warn!(elapsed_ms, "poll cancelled before an outcome was detected");
            Err(GateError::Interrupted(format!("cancelled after {elapsed_ms}ms")))
        }
        result = poll(ctx, probes, config) => Ok(result),
    }
}

/// Fan out every probe, fan in as they settle.
async fn sweep<C>(ctx: &C, probes: &ProbeSet<C>, budget: Option<Duration>) -> SweepVerdict
where
    C: ?Sized + Sync,
{
    let mut pending: FuturesUnordered<_> = probes
        .iter()
        .enumerate()
        .map(|(idx, probe)| async move { (idx, evaluate(probe, ctx, budget).await) })
        .collect();

    let mut errors_outstanding = probes.error_count();
    let mut first_success: Option<usize> = None;

    while let Some((idx, fired)) = pending.next().await {
        let class = match probes.get(idx) {
            Some(probe) => probe.class(),
            None => continue,
        };

        match class {
            OutcomeClass::Error => {
                if fired {
                    return SweepVerdict::Fired(OutcomeClass::Error, idx);
                }
                errors_outstanding -= 1;
            }
            OutcomeClass::Success => {
                if fired && first_success.is_none() {
                    first_success = Some(idx);
                }
            }
        }

        if errors_outstanding == 0 {
            if let Some(idx) = first_success {
                return SweepVerdict::Fired(OutcomeClass::Success, idx);
            }
        }
    }

    SweepVerdict::Quiet
}

/// Run one probe; failures and budget overruns read as false.
async fn evaluate<C>(probe: &Probe<C>, ctx: &C, budget: Option<Duration>) -> bool
where
    C: ?Sized + Sync,
{
    let outcome = match budget {
        Some(budget) => match timeout(budget, probe.check(ctx)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(anyhow::anyhow!(
                "check exceeded {}ms budget",
                budget.as_millis()
            )),
        },
        None => probe.check(ctx).await,
    };

    match outcome {
        Ok(fired) => fired,
        Err(err) => {
            debug!(probe = probe.label(), error = %err, "probe check failed, counting as false");
            false
        }
    }
}
