use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ConfigError, HarnessConfig};

pub const LOCAL_ENV_PATH: &str = "config/local.env";

/// Apply `config/local.env` to the process environment.
pub fn load_local_env_overrides() {
    load_env_file(Path::new(LOCAL_ENV_PATH));
}

/// Apply `KEY=VALUE` lines from `path` without overriding variables that
/// are already set. Returns the number of variables applied.
pub fn load_env_file(path: &Path) -> usize {
    if !path.exists() {
        return 0;
    }

    match stdfs::read_to_string(path) {
        Ok(contents) => {
            let mut applied = 0;
            for (idx, raw_line) in contents.lines().enumerate() {
                let line = raw_line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let line = line.strip_prefix("export ").unwrap_or(line);
                let Some((key, value)) = line.split_once('=') else {
                    warn!(line = idx + 1, "invalid local.env entry; skipping");
                    continue;
                };
                let key = key.trim();
                if key.is_empty() || env::var(key).is_ok() {
                    continue;
                }
                env::set_var(key, unescape_value(value.trim()));
                applied += 1;
            }
            info!(path = %path.display(), applied, "Loaded environment overrides");
            applied
        }
        Err(err) => {
            warn!(path = %path.display(), ?err, "failed to read env overrides");
            0
        }
    }
}

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: HarnessConfig,
    pub path: PathBuf,

    /// False when defaults were used because no file exists
    pub from_file: bool,
}

/// Resolve the config file path: explicit, then `./config/config.yaml`,
/// then `<config_dir>/probegate/config.yaml`.
pub fn config_path(explicit: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.clone());
    }

    let local_config = PathBuf::from("config/config.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }

    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("probegate");
    path.push("config.yaml");
    Ok(path)
}

/// Load the config file (or defaults) and apply environment overrides.
pub async fn load_config(explicit: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = config_path(explicit)?;

    let (mut config, from_file) = if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .await
            .map_err(|source| ConfigError::Read {
                path: config_path.clone(),
                source,
            })?;
        let config = HarnessConfig::from_yaml(&content, &config_path)?;
        info!("Loaded configuration from: {}", config_path.display());
        (config, true)
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        (HarnessConfig::default(), false)
    };

    config.apply_env_overrides()?;
    for (name, interval_ms, timeout_ms) in config.timing_warnings() {
        warn!(
            operation = name,
            interval_ms, timeout_ms, "poll interval out of range, it will be clamped"
        );
    }

    Ok(LoadedConfig {
        config,
        path: config_path,
        from_file,
    })
}

fn unescape_value(value: &str) -> String {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        let inner = &value[1..value.len() - 1];
        inner
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\r", "\r")
            .replace("\\t", "\t")
    } else {
        value.to_string()
    }
}
