use super::config::cmd_config;
use super::context::CliContext;
use super::env::CliArgs;
use super::simulate::cmd_simulate;
use super::version::cmd_version;
use crate::cli::commands::Commands;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Config(args) => cmd_config(args, ctx, cli.output).await,
        Commands::Simulate(args) => cmd_simulate(args, ctx, cli.output).await,
        Commands::Version => cmd_version(cli.output),
    }
}
