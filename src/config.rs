//! bandhop configuration
//!
//! Loaded from TOML when `--config` is given, otherwise defaults. Command
//! line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bandhop_core::{BandTable, LoadError};
use bandhop_rig::fldigi::{DEFAULT_HOST, DEFAULT_PORT};
use serde::{Deserialize, Serialize};

use crate::monitor::types::MonitorConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("an external command is required (--command/-c or monitor.command)")]
    MissingCommand,

    #[error("polling interval must be positive")]
    ZeroInterval,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BandhopConfig {
    pub fldigi: FldigiConfig,
    pub monitor: MonitorSection,
    pub bands: BandsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FldigiConfig {
    /// Host running fldigi's XML-RPC server.
    pub host: String,
    /// XML-RPC port.
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSection {
    /// Poll interval in milliseconds.
    pub interval_ms: u64,
    /// Program run with the new band name as its only argument.
    pub command: Option<String>,
    /// Kill the command if it runs longer than this. Unbounded when unset.
    pub notify_timeout_ms: Option<u64>,
    /// Emit one JSON object per monitor event on stderr.
    pub json_events: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BandsConfig {
    /// Band plan file replacing the built-in one.
    pub file: Option<PathBuf>,
}

impl Default for FldigiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            command: None,
            notify_timeout_ms: None,
            json_events: false,
        }
    }
}

impl BandhopConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Check the settings the poll loop cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command().is_none() {
            return Err(ConfigError::MissingCommand);
        }
        if self.monitor.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    pub fn command(&self) -> Option<&str> {
        self.monitor
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.monitor.interval_ms)
    }

    pub fn notify_timeout(&self) -> Option<Duration> {
        self.monitor.notify_timeout_ms.map(Duration::from_millis)
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            interval: self.interval(),
            json_events: self.monitor.json_events,
        }
    }

    /// The configured band plan file, or the built-in plan.
    pub fn band_table(&self) -> Result<BandTable, LoadError> {
        match &self.bands.file {
            Some(path) => BandTable::load(path),
            None => BandTable::builtin(),
        }
    }
}

/// Parse a duration such as `5s`, `500ms`, `1m30s`, `1.5h` or a bare number
/// of seconds. Units are `ns`, `us`/`µs`, `ms`, `s`, `m` and `h`, and may be
/// chained.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".into());
    }
    if let Ok(secs) = s.parse::<f64>() {
        return from_nanos_f64(secs * 1e9, s);
    }

    let mut total_ns = 0.0;
    let mut rest = s;
    while !rest.is_empty() {
        let split = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(split);
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid duration '{s}'"))?;
        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let ns_per_unit = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3_600e9,
            "" => return Err(format!("missing unit in '{s}'")),
            other => return Err(format!("unknown duration unit '{other}' in '{s}'")),
        };
        total_ns += value * ns_per_unit;
        rest = next;
    }
    from_nanos_f64(total_ns, s)
}

fn from_nanos_f64(ns: f64, input: &str) -> Result<Duration, String> {
    if !ns.is_finite() || ns < 0.0 || ns > u64::MAX as f64 {
        return Err(format!("invalid duration '{input}'"));
    }
    Ok(Duration::from_nanos(ns.round() as u64))
}

/// [`parse_duration`] for settings stored in whole milliseconds; anything
/// that would truncate to zero is rejected instead of silently becoming 0.
pub fn parse_millis(s: &str) -> Result<Duration, String> {
    let duration = parse_duration(s)?;
    if !duration.is_zero() && duration < Duration::from_millis(1) {
        return Err(format!("'{s}' is below the 1ms resolution"));
    }
    Ok(duration)
}
