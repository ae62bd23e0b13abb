//! bandhop core - band plan table and frequency classification

pub mod band;
pub mod error;
pub mod table;

pub use band::{Band, BandRange, HZ_PER_MHZ};
pub use error::{LoadError, Result};
pub use table::{BandTable, BUILTIN_BAND_PLAN};
