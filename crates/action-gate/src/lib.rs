//! Outcome poller - multi-signal outcome detection
//!
//! This crate decides whether an expected state has been reached, and which
//! one, from several unreliable observation channels:
//! - Probe model (labelled async boolean checks tagged success or error)
//! - Sweep-based fan-out/fan-in evaluation with error precedence
//! - Deadline and interval bookkeeping, optional per-probe budget
//! - Cooperative cancellation for upstream test timeouts

pub mod errors;
pub mod poller;
pub mod probes;

pub use errors::*;
pub use poller::*;
pub use probes::*;

pub use probegate_core_types::{OutcomeClass, PollConfig, PollResult};
