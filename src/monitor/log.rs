//! JSON event lines for the monitor, one object per line on stderr

use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EventLine {
    pub ts: String,
    pub level: &'static str,
    pub event: &'static str,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Event sink; a disabled log drops everything.
#[derive(Debug, Clone, Copy)]
pub struct EventLog {
    enabled: bool,
}

impl EventLog {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn info(&self, event: &'static str, data: serde_json::Value) {
        self.emit("info", event, data);
    }

    pub fn warn(&self, event: &'static str, data: serde_json::Value) {
        self.emit("warn", event, data);
    }

    pub fn error(&self, event: &'static str, data: serde_json::Value) {
        self.emit("error", event, data);
    }

    fn emit(&self, level: &'static str, event: &'static str, data: serde_json::Value) {
        if !self.enabled {
            return;
        }
        if let Some(json) = render(level, event, data) {
            eprintln!("{json}");
        }
    }
}

pub fn render(level: &'static str, event: &'static str, data: serde_json::Value) -> Option<String> {
    let line = EventLine {
        ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        level,
        event,
        data,
    };
    serde_json::to_string(&line).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_flattens_fields() {
        let line = render("info", "band_changed", json!({"from": "40m", "to": "20m"})).unwrap();
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["level"], "info");
        assert_eq!(v["event"], "band_changed");
        assert_eq!(v["from"], "40m");
        assert_eq!(v["to"], "20m");
        assert!(v["ts"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn disabled_log() {
        assert!(!EventLog::new(false).is_enabled());
        EventLog::new(false).info("monitor_started", json!({}));
    }
}
