//! Per-operation poll timing

use probegate_core_types::PollConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Poll timing for each flow operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTimeouts {
    /// Waiting for a control before filling or clicking it
    pub action: PollConfig,

    /// Waiting for the login outcome
    pub login: PollConfig,

    /// Waiting for payment or request confirmation
    pub payment: PollConfig,

    /// Contact selection
    pub contact: PollConfig,

    /// Controls and pages reached through navigation
    pub navigation: PollConfig,

    /// Generic visibility expectations
    pub expect: PollConfig,
}

impl FlowTimeouts {
    /// Same interval for every operation
    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        for config in [
            &mut self.action,
            &mut self.login,
            &mut self.payment,
            &mut self.contact,
            &mut self.navigation,
            &mut self.expect,
        ] {
            config.interval_ms = interval_ms;
        }
        self
    }
}

impl Default for FlowTimeouts {
    fn default() -> Self {
        Self {
            action: PollConfig::new(30_000, DEFAULT_POLL_INTERVAL_MS),
            login: PollConfig::new(8_000, DEFAULT_POLL_INTERVAL_MS),
            payment: PollConfig::new(15_000, DEFAULT_POLL_INTERVAL_MS),
            contact: PollConfig::new(10_000, DEFAULT_POLL_INTERVAL_MS),
            navigation: PollConfig::new(15_000, DEFAULT_POLL_INTERVAL_MS),
            expect: PollConfig::new(15_000, DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_interval_reaches_every_operation() {
        let timeouts = FlowTimeouts::default().with_interval(50);

        assert_eq!(timeouts.action, PollConfig::new(30_000, 50));
        assert_eq!(timeouts.login, PollConfig::new(8_000, 50));
        assert_eq!(timeouts.expect, PollConfig::new(15_000, 50));
    }
}
