//! Band table - an ordered, immutable list of band ranges
//!
//! Definition format is one `name:start_mhz:end_mhz` entry per line. Blank
//! lines and `#` comments are ignored. A malformed line is skipped rather
//! than failing the load, so a hand-edited band file with one typo still
//! yields a usable table. Only a table with no entries at all is an error.

use std::path::Path;

use tracing::{debug, info};

use crate::band::{Band, BandRange, HZ_PER_MHZ};
use crate::error::{LoadError, Result};

/// Default band plan compiled into the binary.
pub const BUILTIN_BAND_PLAN: &str = include_str!("bands.txt");

#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    ranges: Vec<BandRange>,
}

#[derive(Debug, PartialEq)]
enum LineError {
    FieldCount(usize),
    EmptyName,
    BadBound(String),
    Inverted,
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount(n) => write!(f, "expected 3 fields, found {n}"),
            Self::EmptyName => write!(f, "empty band name"),
            Self::BadBound(s) => write!(f, "invalid bound {s:?}"),
            Self::Inverted => write!(f, "start is not below end"),
        }
    }
}

impl BandTable {
    /// Build a table from already-validated ranges.
    pub fn new(ranges: Vec<BandRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(Self { ranges })
    }

    /// The embedded default band plan.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_BAND_PLAN)
    }

    /// Read and parse a band definition file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let table = Self::parse(&text)?;
        info!("Loaded {} bands from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut ranges = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line) {
                Ok(range) => ranges.push(range),
                Err(e) => debug!("band plan line {}: skipped ({e}): {line}", idx + 1),
            }
        }
        Self::new(ranges)
    }

    /// Classify a frequency in hertz. First matching range wins.
    pub fn classify(&self, hz: f64) -> Band {
        let mhz = hz / HZ_PER_MHZ;
        self.ranges
            .iter()
            .find(|r| r.contains_mhz(mhz))
            .map(|r| Band::Known(r.name.clone()))
            .unwrap_or(Band::Unknown)
    }

    pub fn get(&self, name: &str) -> Option<&BandRange> {
        self.ranges.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BandRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn parse_line(line: &str) -> std::result::Result<BandRange, LineError> {
    let fields: Vec<&str> = line.split(':').map(str::trim).collect();
    let &[name, start, end] = fields.as_slice() else {
        return Err(LineError::FieldCount(fields.len()));
    };
    if name.is_empty() {
        return Err(LineError::EmptyName);
    }
    let start_mhz = parse_bound(start)?;
    let end_mhz = parse_bound(end)?;
    if start_mhz >= end_mhz {
        return Err(LineError::Inverted);
    }
    Ok(BandRange::new(name, start_mhz, end_mhz))
}

fn parse_bound(s: &str) -> std::result::Result<f64, LineError> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(LineError::BadBound(s.to_string())),
    }
}
