use std::sync::Arc;

use bandhop_core::{BandTable, HZ_PER_MHZ};
use bandhop_rig::FrequencySource;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::log::EventLog;
use super::notify::Notifier;
use super::types::*;

/// Polls a frequency source and runs the notifier on every band change.
pub struct Monitor {
    bands: Arc<BandTable>,
    source: Arc<dyn FrequencySource>,
    notifier: Arc<dyn Notifier>,
    config: MonitorConfig,
    events: EventLog,
}

fn mhz(hz: f64) -> f64 {
    hz / HZ_PER_MHZ
}

impl Monitor {
    pub fn new(
        bands: Arc<BandTable>,
        source: Arc<dyn FrequencySource>,
        notifier: Arc<dyn Notifier>,
        config: MonitorConfig,
    ) -> Self {
        let events = EventLog::new(config.json_events);
        Self {
            bands,
            source,
            notifier,
            config,
            events,
        }
    }

    /// Poll until `cancel` fires. Returns the final tracking state.
    pub async fn run(&self, cancel: CancellationToken) -> MonitorState {
        let mut state = MonitorState::new();

        info!(
            "Starting {} band monitor (interval: {:?})",
            self.source.name(),
            self.config.interval
        );
        self.events.info(
            "monitor_started",
            json!({
                "source": self.source.name(),
                "interval_ms": self.config.interval.as_millis() as u64,
                "bands": self.bands.len(),
            }),
        );

        while !cancel.is_cancelled() {
            self.poll_once(&mut state).await;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        info!("Band monitor stopped");
        self.events.info(
            "monitor_stopped",
            json!({ "last_band": state.last_band }),
        );
        state
    }

    /// One fetch/classify/compare/notify step. Never fails; errors are
    /// reported and leave `state` untouched.
    pub async fn poll_once(&self, state: &mut MonitorState) -> TickOutcome {
        let hz = match self.source.fetch_frequency().await {
            Ok(hz) => hz,
            Err(e) => {
                warn!("Error getting frequency: {}", e);
                self.events
                    .warn("fetch_failed", json!({ "error": e.to_string() }));
                return TickOutcome::FetchFailed;
            }
        };

        let band = self.bands.classify(hz);
        if !band.is_known() {
            debug!("{:.3} MHz is outside every band", mhz(hz));
            return TickOutcome::Unknown { hz };
        }

        match state.observe(&band) {
            None => TickOutcome::Unchanged {
                band: band.to_string(),
            },
            Some(Transition::Detected { band }) => {
                info!("Initial band detected: {} ({:.3} MHz)", band, mhz(hz));
                self.events.info(
                    "band_detected",
                    json!({ "band": band, "mhz": mhz(hz) }),
                );
                TickOutcome::Detected { band, hz }
            }
            Some(Transition::Changed { from, to }) => {
                info!("Band changed from {} to {} ({:.3} MHz)", from, to, mhz(hz));
                self.events.info(
                    "band_changed",
                    json!({ "from": from, "to": to, "mhz": mhz(hz) }),
                );
                let notified = match self.notifier.notify(&to).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Error running external command: {}", e);
                        self.events.error(
                            "notify_failed",
                            json!({ "band": to, "error": e.to_string() }),
                        );
                        false
                    }
                };
                TickOutcome::Changed {
                    from,
                    to,
                    hz,
                    notified,
                }
            }
        }
    }
}
