use clap::Subcommand;

use super::config::ConfigArgs;
use super::simulate::SimulateArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Inspect the effective harness configuration
    Config(ConfigArgs),

    /// Run the outcome poller against scheduled synthetic probes
    Simulate(SimulateArgs),

    /// Show build information
    Version,
}
