//! Offline poll simulation
//!
//! Runs the real poller against synthetic probes that turn true at
//! scheduled offsets. Used to choose intervals against timing requirements
//! without a browser.

use action_gate::{poll_detailed, Probe, ProbeSet};
use futures::FutureExt;
use probegate_core_types::{OutcomeClass, PollConfig, PollResult};
use serde::Serialize;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::info;

/// Synthetic probe schedule
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimulationPlan {
    pub timeout_ms: u64,
    pub interval_ms: u64,
    pub probe_timeout_ms: Option<u64>,

    /// One success probe per entry, true from that offset on
    pub success_at_ms: Vec<u64>,

    /// One error probe per entry, true from that offset on
    pub error_at_ms: Vec<u64>,

    /// Success probes whose check always fails
    pub failing_probes: usize,

    /// Time each check takes to answer
    pub probe_latency_ms: u64,
}

impl SimulationPlan {
    pub fn config(&self) -> PollConfig {
        let config = PollConfig::new(self.timeout_ms, self.interval_ms);
        match self.probe_timeout_ms {
            Some(ms) => config.with_probe_timeout(ms),
            None => config,
        }
    }

    /// Outcome the plan should produce when sweeps were instantaneous and
    /// continuous: earliest scheduled probe within the timeout, error first
    /// on ties.
    pub fn ideal_outcome(&self) -> Option<(OutcomeClass, u64)> {
        let first = |offsets: &[u64]| offsets.iter().copied().filter(|at| *at <= self.timeout_ms).min();
        match (first(self.error_at_ms.as_slice()), first(self.success_at_ms.as_slice())) {
            (Some(err), Some(ok)) if err <= ok => Some((OutcomeClass::Error, err)),
            (_, Some(ok)) => Some((OutcomeClass::Success, ok)),
            (Some(err), None) => Some((OutcomeClass::Error, err)),
            (None, None) => None,
        }
    }
}

/// Shared state handed to every synthetic probe
pub struct SimulationClock {
    started: Instant,
    latency: Duration,
}

impl SimulationClock {
    async fn answer_delay(&self) {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
    }

    fn reached(&self, at: Duration) -> bool {
        self.started.elapsed() >= at
    }
}

fn scheduled_probe(label: String, class: OutcomeClass, at_ms: u64) -> Probe<SimulationClock> {
    let at = Duration::from_millis(at_ms);
    Probe::new(label, class, move |clock: &SimulationClock| {
        async move {
            clock.answer_delay().await;
            Ok(clock.reached(at))
        }
        .boxed()
    })
}

fn failing_probe(label: String) -> Probe<SimulationClock> {
    Probe::new(label, OutcomeClass::Success, |clock: &SimulationClock| {
        async move {
            clock.answer_delay().await;
            Err(anyhow::anyhow!("simulated lookup failure"))
        }
        .boxed()
    })
}

pub fn build_probes(plan: &SimulationPlan) -> ProbeSet<SimulationClock> {
    let success = plan
        .success_at_ms
        .iter()
        .enumerate()
        .map(|(idx, at)| scheduled_probe(format!("success-{}@{at}ms", idx + 1), OutcomeClass::Success, *at));
    let error = plan
        .error_at_ms
        .iter()
        .enumerate()
        .map(|(idx, at)| scheduled_probe(format!("error-{}@{at}ms", idx + 1), OutcomeClass::Error, *at));
    let failing = (0..plan.failing_probes).map(|idx| failing_probe(format!("failing-{}", idx + 1)));

    success.chain(error).chain(failing).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    /// `success`, `error` or `timeout`
    pub outcome: String,

    /// Label of the probe that fired
    pub probe: Option<String>,
    pub sweeps: u32,
    pub elapsed_ms: u64,

    /// Detection delay past the earliest scheduled outcome
    pub detection_lag_ms: Option<u64>,

    pub timeout_ms: u64,
    pub interval_ms: u64,
}

pub async fn run_simulation(plan: &SimulationPlan) -> SimulationReport {
    let config = plan.config();
    let probes = build_probes(plan);
    let clock = SimulationClock {
        started: Instant::now(),
        latency: Duration::from_millis(plan.probe_latency_ms),
    };

    let report = poll_detailed(&clock, &probes, &config).await;
    let elapsed_ms = report.elapsed.as_millis() as u64;

    let outcome = match &report.result {
        PollResult::Success(_) => "success",
        PollResult::Error(_) => "error",
        PollResult::Timeout => "timeout",
    };
    let detection_lag_ms = match (report.result.class(), plan.ideal_outcome()) {
        (Some(class), Some((expected, at))) if class == expected => Some(elapsed_ms.saturating_sub(at)),
        _ => None,
    };

    info!(
        outcome,
        sweeps = report.sweeps,
        elapsed_ms,
        ?detection_lag_ms,
        "simulation finished"
    );

    SimulationReport {
        outcome: outcome.to_string(),
        probe: report.result.label().map(str::to_string),
        sweeps: report.sweeps,
        elapsed_ms,
        detection_lag_ms,
        timeout_ms: config.timeout_ms,
        interval_ms: config.interval_ms,
    }
}
