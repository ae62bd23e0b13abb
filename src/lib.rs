//! bandhop - runs a command whenever fldigi's VFO moves to another band

pub mod config;
pub mod monitor;

pub use config::{BandhopConfig, ConfigError};
pub use monitor::{CommandNotifier, Monitor, MonitorConfig, MonitorState, Notifier, TickOutcome};
