use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use uuid::Uuid;

/// Smallest interval the poller will sleep between sweeps.
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Rejected timing configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimingError {
    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("poll interval {interval_ms}ms exceeds timeout {timeout_ms}ms")]
    IntervalExceedsTimeout { interval_ms: u64, timeout_ms: u64 },
}

/// Correlation id attached to every log line of a single poll.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PollId(pub String);

impl PollId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for PollId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome a probe signals when it reports true.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OutcomeClass {
    Success,
    Error,
}

impl OutcomeClass {
    pub fn name(&self) -> &'static str {
        match self {
            OutcomeClass::Success => "success",
            OutcomeClass::Error => "error",
        }
    }
}

/// Terminal result of one poll.
///
/// The label is the label of the probe whose check fired.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(tag = "outcome", content = "probe", rename_all = "snake_case"))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PollResult {
    Success(String),
    Error(String),
    Timeout,
}

impl PollResult {
    pub fn fired(class: OutcomeClass, label: impl Into<String>) -> Self {
        match class {
            OutcomeClass::Success => PollResult::Success(label.into()),
            OutcomeClass::Error => PollResult::Error(label.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PollResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PollResult::Error(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PollResult::Timeout)
    }

    /// Class of the probe that fired, `None` on timeout.
    pub fn class(&self) -> Option<OutcomeClass> {
        match self {
            PollResult::Success(_) => Some(OutcomeClass::Success),
            PollResult::Error(_) => Some(OutcomeClass::Error),
            PollResult::Timeout => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            PollResult::Success(label) | PollResult::Error(label) => Some(label),
            PollResult::Timeout => None,
        }
    }
}

impl fmt::Display for PollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollResult::Success(label) => write!(f, "success({label})"),
            PollResult::Error(label) => write!(f, "error({label})"),
            PollResult::Timeout => f.write_str("timeout"),
        }
    }
}

/// Timing for one poll: total budget and the pause between sweeps.
///
/// Out-of-range values are tolerated, see [`PollConfig::effective_interval`].
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PollConfig {
    /// Total time budget in milliseconds, measured from poll start
    pub timeout_ms: u64,

    /// Pause between sweeps in milliseconds
    pub interval_ms: u64,

    /// Per-probe budget; a check running longer counts as false
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub probe_timeout_ms: Option<u64>,
}

impl PollConfig {
    pub fn new(timeout_ms: u64, interval_ms: u64) -> Self {
        Self {
            timeout_ms,
            interval_ms,
            probe_timeout_ms: None,
        }
    }

    pub fn with_probe_timeout(mut self, probe_timeout_ms: u64) -> Self {
        self.probe_timeout_ms = Some(probe_timeout_ms);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_ms.map(Duration::from_millis)
    }

    /// Interval actually slept between sweeps. Zero is clamped to
    /// [`MIN_POLL_INTERVAL_MS`]; the poller additionally caps each sleep
    /// at the time remaining before the deadline.
    pub fn effective_interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    /// Strict check of `0 < interval <= timeout`.
    pub fn validate(&self) -> Result<(), TimingError> {
        if self.interval_ms == 0 {
            return Err(TimingError::ZeroInterval);
        }
        if self.interval_ms > self.timeout_ms {
            return Err(TimingError::IntervalExceedsTimeout {
                interval_ms: self.interval_ms,
                timeout_ms: self.timeout_ms,
            });
        }
        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(5_000, 200)
    }
}

/// Wall-clock budget started at construction.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.budget
    }

    /// Sleep length for the next pause: the interval, or less if the
    /// deadline comes first.
    pub fn next_pause(&self, interval: Duration) -> Duration {
        interval.min(self.remaining())
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}
