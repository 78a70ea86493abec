//! probegate
//!
//! Outcome polling and resilient locators for end-to-end UI harnesses.
//! The page flows live in `action-flow`; this crate adds configuration,
//! the offline simulator and the command line.

pub mod cli;
pub mod config;
pub mod simulate;

pub use action_flow::{
    Credentials, FlowError, FlowTimeouts, PageDriver, Session, Transfer, TransferKind,
};
pub use action_gate::{poll, poll_detailed, poll_until_cancelled, Probe, ProbeSet};
pub use action_locator::{resolve, SelectionStrategy, SelectorSpec};
pub use config::{ConfigError, HarnessConfig};
pub use probegate_core_types::{OutcomeClass, PollConfig, PollResult};
