use std::path::Path;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::CliContext;
use crate::cli::output::OutputFormat;
use crate::config::HarnessConfig;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration after environment overrides
    Show,

    /// Print the resolved configuration file path
    Path,

    /// Check URLs and poll timings
    Validate,
}

#[derive(Serialize)]
struct ConfigView<'a> {
    path: &'a Path,
    from_file: bool,
    config: &'a HarnessConfig,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let view = ConfigView {
                path: ctx.config_path(),
                from_file: ctx.from_file(),
                config: ctx.config(),
            };
            let rendered = output.render(&view, |view| {
                let source = if view.from_file { "file" } else { "defaults" };
                let body = serde_yaml::to_string(view.config).unwrap_or_default();
                format!(
                    "Current configuration ({}, from {}):\n{}",
                    view.path.display(),
                    source,
                    body
                )
            })?;
            println!("{}", rendered.trim_end());
        }
        ConfigAction::Path => {
            println!("{}", ctx.config_path().display());
        }
        ConfigAction::Validate => {
            let issues = validation_issues(ctx.config());
            if ctx.config().test_password().is_err() {
                println!("note: TEST_PASSWORD is not set; login flows will fail");
            }
            if issues.is_empty() {
                println!("Configuration is valid");
            } else {
                for issue in &issues {
                    println!("- {}", issue);
                }
                bail!("configuration has {} issue(s)", issues.len());
            }
        }
    }

    Ok(())
}

fn validation_issues(config: &HarnessConfig) -> Vec<String> {
    let mut issues = Vec::new();

    for (name, url) in [("base_url", &config.base_url), ("api_url", &config.api_url)] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            issues.push(format!("{} must be an http(s) URL, got {:?}", name, url));
        }
    }

    for (name, interval_ms, timeout_ms) in config.timing_warnings() {
        if interval_ms == 0 {
            issues.push(format!("{} poll interval is 0ms", name));
        } else {
            issues.push(format!(
                "{} poll interval {}ms exceeds its {}ms timeout",
                name, interval_ms, timeout_ms
            ));
        }
    }

    issues
}
