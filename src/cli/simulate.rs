use std::time::Duration;

use anyhow::Result;
use clap::Args;
use humantime::format_duration;

use crate::cli::context::CliContext;
use crate::cli::output::OutputFormat;
use crate::simulate::{run_simulation, SimulationPlan, SimulationReport};

#[derive(Args, Clone, Debug)]
pub struct SimulateArgs {
    /// Poll deadline; defaults to the configured login timeout
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Pause between sweeps; defaults to the configured poll interval
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Cap on a single probe check
    #[arg(long)]
    pub probe_timeout_ms: Option<u64>,

    /// Offsets at which success probes turn true (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub success_at_ms: Vec<u64>,

    /// Offsets at which error probes turn true (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub error_at_ms: Vec<u64>,

    /// Success probes whose checks always fail
    #[arg(long, default_value_t = 0)]
    pub failing_probes: usize,

    /// Time every probe check takes to answer
    #[arg(long, default_value_t = 0)]
    pub probe_latency_ms: u64,
}

impl SimulateArgs {
    pub fn plan(&self, ctx: &CliContext) -> SimulationPlan {
        let timeouts = &ctx.config().timeouts;
        SimulationPlan {
            timeout_ms: self.timeout_ms.unwrap_or(timeouts.login_ms),
            interval_ms: self.interval_ms.unwrap_or(timeouts.poll_interval_ms),
            probe_timeout_ms: self.probe_timeout_ms,
            success_at_ms: self.success_at_ms.clone(),
            error_at_ms: self.error_at_ms.clone(),
            failing_probes: self.failing_probes,
            probe_latency_ms: self.probe_latency_ms,
        }
    }
}

pub async fn cmd_simulate(args: SimulateArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let plan = args.plan(ctx);
    let report = run_simulation(&plan).await;
    println!("{}", output.render(&report, human_report)?.trim_end());
    Ok(())
}

fn human_report(report: &SimulationReport) -> String {
    let millis = |ms: u64| format_duration(Duration::from_millis(ms)).to_string();

    let mut lines = vec![format!(
        "Outcome: {}{}",
        report.outcome,
        report
            .probe
            .as_deref()
            .map(|probe| format!(" ({})", probe))
            .unwrap_or_default()
    )];
    lines.push(format!(
        "Elapsed: {} over {} sweep(s)",
        millis(report.elapsed_ms),
        report.sweeps
    ));
    if let Some(lag) = report.detection_lag_ms {
        lines.push(format!("Detection lag: {}", millis(lag)));
    }
    lines.push(format!(
        "Timing: timeout {}, interval {}",
        millis(report.timeout_ms),
        millis(report.interval_ms)
    ));
    lines.join("\n")
}
