//! Integration tests for the band monitor: scripted frequency source and a
//! recording notifier driving the real poll loop.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bandhop::monitor::NotifyError;
use bandhop::*;
use bandhop_core::BandTable;
use bandhop_rig::{FetchError, FetchResult, FrequencySource};
use tokio_util::sync::CancellationToken;

/// Plays back a fixed list of readings, then cancels the monitor.
struct ScriptedSource {
    readings: Mutex<VecDeque<FetchResult<f64>>>,
    done: CancellationToken,
    calls: Mutex<usize>,
}

impl ScriptedSource {
    fn new(readings: Vec<FetchResult<f64>>, done: CancellationToken) -> Self {
        Self {
            readings: Mutex::new(readings.into()),
            done,
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl FrequencySource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_frequency(&self) -> FetchResult<f64> {
        *self.calls.lock().unwrap() += 1;
        let next = self.readings.lock().unwrap().pop_front();
        match next {
            Some(reading) => reading,
            None => {
                self.done.cancel();
                Err(FetchError::Empty)
            }
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, band: &str) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(band.to_string());
        if self.fail {
            Err(NotifyError::Exited {
                command: "hook".into(),
                code: Some(2),
            })
        } else {
            Ok(())
        }
    }
}

const M10: f64 = 28_074_000.0;
const M15: f64 = 21_074_000.0;
const M20: f64 = 14_074_000.0;
const M40: f64 = 7_074_000.0;
const GAP: f64 = 100_000_000.0;

fn config() -> MonitorConfig {
    MonitorConfig {
        interval: Duration::from_secs(5),
        json_events: false,
    }
}

fn monitor(
    readings: Vec<FetchResult<f64>>,
    notifier: Arc<RecordingNotifier>,
) -> (Monitor, Arc<ScriptedSource>, CancellationToken) {
    let cancel = CancellationToken::new();
    let source = Arc::new(ScriptedSource::new(readings, cancel.clone()));
    let bands = Arc::new(BandTable::builtin().unwrap());
    let monitor = Monitor::new(bands, source.clone(), notifier, config());
    (monitor, source, cancel)
}

fn fetch_failure() -> FetchResult<f64> {
    Err(FetchError::Http { status: 503 })
}

// ===========================================================================
// Poll loop
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn notifies_only_on_changes() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (monitor, _, cancel) = monitor(
        vec![Ok(M10), Ok(M10), Ok(M20), Ok(GAP), Ok(M20), Ok(M15)],
        notifier.clone(),
    );
    let state = monitor.run(cancel).await;
    assert_eq!(notifier.calls(), vec!["20m", "15m"]);
    assert_eq!(state.last_band.as_deref(), Some("15m"));
}

#[tokio::test(start_paused = true)]
async fn first_band_never_notifies() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (monitor, _, cancel) = monitor(vec![Ok(M40)], notifier.clone());
    let state = monitor.run(cancel).await;
    assert!(notifier.calls().is_empty());
    assert_eq!(state.last_band.as_deref(), Some("40m"));
}

#[tokio::test(start_paused = true)]
async fn unknown_between_same_band_is_silent() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (monitor, _, cancel) = monitor(vec![Ok(M20), Ok(GAP), Ok(M20)], notifier.clone());
    monitor.run(cancel).await;
    assert!(notifier.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unknown_readings_do_not_reset_tracking() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (monitor, _, cancel) = monitor(
        vec![Ok(GAP), Ok(M40), Ok(0.0), Ok(M20)],
        notifier.clone(),
    );
    let state = monitor.run(cancel).await;
    assert_eq!(notifier.calls(), vec!["20m"]);
    assert_eq!(state.last_band.as_deref(), Some("20m"));
}

#[tokio::test(start_paused = true)]
async fn fetch_errors_are_absorbed() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (monitor, source, cancel) = monitor(
        vec![
            fetch_failure(),
            Ok(M40),
            fetch_failure(),
            fetch_failure(),
            Ok(M40),
            Ok(M20),
        ],
        notifier.clone(),
    );
    let state = monitor.run(cancel).await;
    assert_eq!(notifier.calls(), vec!["20m"]);
    assert_eq!(state.last_band.as_deref(), Some("20m"));
    // six scripted readings plus the one that ends the script
    assert_eq!(source.calls(), 7);
}

#[tokio::test(start_paused = true)]
async fn failed_notify_still_advances_band() {
    let notifier = Arc::new(RecordingNotifier::failing());
    let (monitor, _, cancel) = monitor(
        vec![Ok(M40), Ok(M20), Ok(M20), Ok(M20), Ok(M10)],
        notifier.clone(),
    );
    let state = monitor.run(cancel).await;
    assert_eq!(notifier.calls(), vec!["20m", "10m"]);
    assert_eq!(state.last_band.as_deref(), Some("10m"));
}

#[tokio::test(start_paused = true)]
async fn sleeps_interval_between_polls() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (monitor, _, cancel) = monitor(vec![Ok(M40), Ok(M40), Ok(M40)], notifier);
    let start = tokio::time::Instant::now();
    monitor.run(cancel).await;
    // three readings, three sleeps, then the terminating fetch cancels
    assert_eq!(start.elapsed(), Duration::from_secs(15));
}

#[tokio::test]
async fn cancelled_before_start_never_polls() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (monitor, source, cancel) = monitor(vec![Ok(M40)], notifier);
    cancel.cancel();
    let state = monitor.run(cancel).await;
    assert_eq!(source.calls(), 0);
    assert!(!state.is_tracking());
}

// ===========================================================================
// Single tick outcomes
// ===========================================================================

#[tokio::test]
async fn poll_once_outcomes() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (monitor, _, _) = monitor(
        vec![fetch_failure(), Ok(GAP), Ok(M40), Ok(M40), Ok(M20)],
        notifier.clone(),
    );
    let mut state = MonitorState::new();

    assert_eq!(monitor.poll_once(&mut state).await, TickOutcome::FetchFailed);
    assert_eq!(monitor.poll_once(&mut state).await, TickOutcome::Unknown { hz: GAP });
    assert!(!state.is_tracking());
    assert_eq!(
        monitor.poll_once(&mut state).await,
        TickOutcome::Detected { band: "40m".into(), hz: M40 }
    );
    assert_eq!(
        monitor.poll_once(&mut state).await,
        TickOutcome::Unchanged { band: "40m".into() }
    );
    assert_eq!(
        monitor.poll_once(&mut state).await,
        TickOutcome::Changed {
            from: "40m".into(),
            to: "20m".into(),
            hz: M20,
            notified: true,
        }
    );
    assert_eq!(notifier.calls(), vec!["20m"]);
}

#[tokio::test]
async fn poll_once_reports_failed_notify() {
    let notifier = Arc::new(RecordingNotifier::failing());
    let (monitor, _, _) = monitor(vec![Ok(M40), Ok(M10)], notifier);
    let mut state = MonitorState::new();
    monitor.poll_once(&mut state).await;
    match monitor.poll_once(&mut state).await {
        TickOutcome::Changed { notified, to, .. } => {
            assert!(!notified);
            assert_eq!(to, "10m");
        }
        other => panic!("expected change, got {other:?}"),
    }
    assert_eq!(state.last_band.as_deref(), Some("10m"));
}

// ===========================================================================
// Command notifier end to end
// ===========================================================================

#[tokio::test]
async fn command_notifier_failure_does_not_stop_monitor() {
    let cancel = CancellationToken::new();
    let source = Arc::new(ScriptedSource::new(vec![Ok(M40), Ok(M20)], cancel.clone()));
    let monitor = Monitor::new(
        Arc::new(BandTable::builtin().unwrap()),
        source,
        Arc::new(CommandNotifier::new("false")),
        MonitorConfig {
            interval: Duration::from_millis(1),
            json_events: true,
        },
    );
    let state = monitor.run(cancel).await;
    assert_eq!(state.last_band.as_deref(), Some("20m"));
}
