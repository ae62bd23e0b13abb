use std::time::Duration;

use bandhop_core::Band;

/// Band tracking state carried across poll ticks.
///
/// `last_band` is `None` until the first known band is seen. Unknown
/// readings never touch it, so a brief excursion out of band while
/// retuning does not register as a change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    pub last_band: Option<String>,
}

/// What a classified reading did to the tracked band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// First known band since the monitor started. Not a change.
    Detected { band: String },
    Changed { from: String, to: String },
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking(&self) -> bool {
        self.last_band.is_some()
    }

    /// Feed one classification. Returns the transition it caused, if any.
    pub fn observe(&mut self, band: &Band) -> Option<Transition> {
        let name = band.name()?;
        match self.last_band.replace(name.to_string()) {
            None => Some(Transition::Detected {
                band: name.to_string(),
            }),
            Some(prev) if prev == name => None,
            Some(prev) => Some(Transition::Changed {
                from: prev,
                to: name.to_string(),
            }),
        }
    }
}

/// Result of one poll tick, for reporting and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    FetchFailed,
    Unknown { hz: f64 },
    Detected { band: String, hz: f64 },
    Unchanged { band: String },
    Changed {
        from: String,
        to: String,
        hz: f64,
        notified: bool,
    },
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub interval: Duration,
    pub json_events: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            json_events: false,
        }
    }
}
