//! Harness configuration
//!
//! YAML file with environment overrides. Every field has a default so an
//! absent file is not an error.

use action_flow::FlowTimeouts;
use probegate_core_types::PollConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_BASE_URL: &str = "BASE_URL";
pub const ENV_API_URL: &str = "API_URL";
pub const ENV_ACTION_TIMEOUT: &str = "PW_TIMEOUT";
pub const ENV_EXPECT_TIMEOUT: &str = "PW_EXPECT_TIMEOUT";
pub const ENV_POLL_INTERVAL: &str = "PROBEGATE_POLL_INTERVAL_MS";
pub const ENV_TEST_PASSWORD: &str = "TEST_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required variable {0} is not set")]
    MissingVariable(String),

    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConfigError::Read { .. })
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            ConfigError::MissingVariable(_) => 2,
            ConfigError::InvalidValue { .. } => 2,
            ConfigError::Read { .. } => 1,
            ConfigError::Parse { .. } => 2,
        }
    }
}

/// Timeouts in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Wait for a control before filling or clicking it (`PW_TIMEOUT`)
    pub action_ms: u64,

    /// Generic visibility expectations (`PW_EXPECT_TIMEOUT`)
    pub expect_ms: u64,

    pub login_ms: u64,
    pub payment_ms: u64,
    pub contact_ms: u64,
    pub navigation_ms: u64,

    /// Pause between sweeps for every flow poll
    pub poll_interval_ms: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            action_ms: 30_000,
            expect_ms: 15_000,
            login_ms: 8_000,
            payment_ms: 15_000,
            contact_ms: 10_000,
            navigation_ms: 15_000,
            poll_interval_ms: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Application under test
    pub base_url: String,

    /// Backing API
    pub api_url: String,

    pub timeouts: TimeoutSettings,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_url: "http://localhost:3001".to_string(),
            timeouts: TimeoutSettings::default(),
        }
    }
}

impl HarnessConfig {
    pub fn from_yaml(raw: &str, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.into(),
            source,
        })
    }

    /// Apply `BASE_URL`, `API_URL`, `PW_TIMEOUT`, `PW_EXPECT_TIMEOUT` and
    /// `PROBEGATE_POLL_INTERVAL_MS` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(url) = read_var(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = read_var(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(ms) = read_millis(ENV_ACTION_TIMEOUT)? {
            self.timeouts.action_ms = ms;
        }
        if let Some(ms) = read_millis(ENV_EXPECT_TIMEOUT)? {
            self.timeouts.expect_ms = ms;
        }
        if let Some(ms) = read_millis(ENV_POLL_INTERVAL)? {
            self.timeouts.poll_interval_ms = ms;
        }
        Ok(())
    }

    /// Password for the seeded test users. Read on demand so commands that
    /// never log in do not require it.
    pub fn test_password(&self) -> Result<String, ConfigError> {
        read_var(ENV_TEST_PASSWORD).ok_or_else(|| ConfigError::MissingVariable(ENV_TEST_PASSWORD.to_string()))
    }

    /// Per-operation poll timing for the page flows
    pub fn flow_timeouts(&self) -> FlowTimeouts {
        let t = &self.timeouts;
        let poll = |timeout_ms| PollConfig::new(timeout_ms, t.poll_interval_ms);
        FlowTimeouts {
            action: poll(t.action_ms),
            login: poll(t.login_ms),
            payment: poll(t.payment_ms),
            contact: poll(t.contact_ms),
            navigation: poll(t.navigation_ms),
            expect: poll(t.expect_ms),
        }
    }

    /// Timings whose poll interval exceeds the timeout, as `(name, interval, timeout)`
    pub fn timing_warnings(&self) -> Vec<(&'static str, u64, u64)> {
        let t = &self.timeouts;
        [
            ("action", t.action_ms),
            ("login", t.login_ms),
            ("payment", t.payment_ms),
            ("contact", t.contact_ms),
            ("navigation", t.navigation_ms),
            ("expect", t.expect_ms),
        ]
        .into_iter()
        .filter(|(_, timeout)| t.poll_interval_ms == 0 || t.poll_interval_ms > *timeout)
        .map(|(name, timeout)| (name, t.poll_interval_ms, timeout))
        .collect()
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn read_millis(name: &str) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = read_var(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|err| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw.clone(),
            reason: err.to_string(),
        })
}
