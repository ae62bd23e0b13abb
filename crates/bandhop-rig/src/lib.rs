//! bandhop rig - frequency sources for the band monitor

pub mod fldigi;
pub mod source;
pub mod xmlrpc;

pub use fldigi::FldigiClient;
pub use source::{FetchError, FetchResult, FrequencySource};
