pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod output;
pub mod runtime;
pub mod simulate;
pub mod version;

pub use config::{cmd_config, ConfigAction, ConfigArgs};
pub use simulate::{cmd_simulate, SimulateArgs};
pub use version::cmd_version;
