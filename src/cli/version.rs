use anyhow::Result;
use serde::Serialize;

use crate::cli::output::OutputFormat;

#[derive(Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_date: &'static str,
    pub git_hash: &'static str,
    pub git_branch: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build_date: env!("BUILD_DATE"),
            git_hash: env!("GIT_HASH"),
            git_branch: env!("GIT_BRANCH"),
        }
    }
}

pub fn cmd_version(output: OutputFormat) -> Result<()> {
    let info = BuildInfo::current();
    let rendered = output.render(&info, |info| {
        format!(
            "probegate {} ({} on {}, built {})",
            info.version, info.git_hash, info.git_branch, info.build_date
        )
    })?;
    println!("{}", rendered.trim_end());
    Ok(())
}
