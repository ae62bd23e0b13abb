//! Band ranges and classification results

use serde::{Serialize, Serializer};

/// Hertz per megahertz.
pub const HZ_PER_MHZ: f64 = 1_000_000.0;

/// One contiguous amateur allocation, bounds in MHz, inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandRange {
    pub name: String,
    pub start_mhz: f64,
    pub end_mhz: f64,
}

impl BandRange {
    pub fn new(name: impl Into<String>, start_mhz: f64, end_mhz: f64) -> Self {
        Self {
            name: name.into(),
            start_mhz,
            end_mhz,
        }
    }

    pub fn contains_mhz(&self, mhz: f64) -> bool {
        mhz >= self.start_mhz && mhz <= self.end_mhz
    }

    pub fn contains_hz(&self, hz: f64) -> bool {
        self.contains_mhz(hz / HZ_PER_MHZ)
    }
}

/// Result of classifying a frequency against a band table.
///
/// `Unknown` is a real outcome (the radio is tuned outside every allocation),
/// not missing data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Band {
    Known(String),
    Unknown,
}

impl Band {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(name) => name,
            Self::Unknown => Self::UNKNOWN,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Known(name) => Some(name),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Band {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&str> for Band {
    fn from(s: &str) -> Self {
        Self::Known(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let r = BandRange::new("160m", 1.8, 2.0);
        assert!(r.contains_hz(1_800_000.0));
        assert!(r.contains_hz(2_000_000.0));
        assert!(!r.contains_hz(1_799_999.0));
        assert!(!r.contains_hz(2_000_001.0));
    }

    #[test]
    fn nan_is_never_contained() {
        let r = BandRange::new("40m", 7.0, 7.3);
        assert!(!r.contains_hz(f64::NAN));
    }

    #[test]
    fn unknown_displays_sentinel() {
        assert_eq!(Band::Unknown.to_string(), "unknown");
        assert_eq!(Band::from("20m").to_string(), "20m");
        assert!(Band::Unknown.name().is_none());
        assert!(!Band::Unknown.is_known());
        assert!(Band::from("20m").is_known());
    }
}
