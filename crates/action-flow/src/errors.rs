//! Flow failure types

use crate::driver::DriverError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified flow failures
///
/// `Rejected` and `Indeterminate` stay distinct all the way to reporting:
/// the first means the application said no, the second that nothing
/// conclusive was observed in time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// An error indicator fired
    #[error("{operation} rejected: error indicator {indicator} visible")]
    Rejected { operation: String, indicator: String },

    /// Neither outcome was observed before the deadline
    #[error("{operation}: neither success nor error observed within {timeout_ms}ms")]
    Indeterminate { operation: String, timeout_ms: u64 },

    /// A control never became visible or enabled
    #[error("expected control {control} {state} within {timeout_ms}ms, found none of: {strategies}")]
    ControlMissing {
        control: String,
        state: String,
        timeout_ms: u64,
        strategies: String,
    },

    /// The control is on the page but never reached the expected state
    #[error("control {control} not {state} within {timeout_ms}ms, resolved to {locator}")]
    UnexpectedState {
        control: String,
        state: String,
        timeout_ms: u64,
        locator: String,
    },

    /// Page driver failure
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Upstream cancellation
    #[error("Flow interrupted: {0}")]
    Interrupted(String),
}

/// Reporting bucket for a [`FlowError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    Rejected,
    Indeterminate,
    MissingControl,
    UnexpectedState,
    Driver,
    Interrupted,
}

impl FailureCategory {
    pub fn name(&self) -> &'static str {
        match self {
            FailureCategory::Rejected => "rejected",
            FailureCategory::Indeterminate => "indeterminate",
            FailureCategory::MissingControl => "missing_control",
            FailureCategory::UnexpectedState => "unexpected_state",
            FailureCategory::Driver => "driver",
            FailureCategory::Interrupted => "interrupted",
        }
    }
}

impl FlowError {
    pub fn category(&self) -> FailureCategory {
        match self {
            FlowError::Rejected { .. } => FailureCategory::Rejected,
            FlowError::Indeterminate { .. } => FailureCategory::Indeterminate,
            FlowError::ControlMissing { .. } => FailureCategory::MissingControl,
            FlowError::UnexpectedState { .. } => FailureCategory::UnexpectedState,
            FlowError::Driver(_) => FailureCategory::Driver,
            FlowError::Interrupted(_) => FailureCategory::Interrupted,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            FlowError::Indeterminate { .. }
            | FlowError::ControlMissing { .. }
            | FlowError::UnexpectedState { .. } => true,
            FlowError::Driver(err) => err.is_retryable(),
            FlowError::Rejected { .. } | FlowError::Interrupted(_) => false,
        }
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            FlowError::Interrupted(_) => 1,
            FlowError::Indeterminate { .. } => 2,
            FlowError::ControlMissing { .. } => 2,
            FlowError::UnexpectedState { .. } => 2,
            FlowError::Rejected { .. } => 2,
            FlowError::Driver(err) => err.severity(),
        }
    }
}

impl From<action_gate::GateError> for FlowError {
    fn from(err: action_gate::GateError) -> Self {
        match err {
            action_gate::GateError::Interrupted(reason) => FlowError::Interrupted(reason),
        }
    }
}
