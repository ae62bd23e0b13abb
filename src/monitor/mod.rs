pub mod log;
pub mod notify;
pub mod poll;
pub mod types;

pub use notify::{CommandNotifier, Notifier, NotifyError};
pub use poll::Monitor;
pub use types::{MonitorConfig, MonitorState, TickOutcome, Transition};
