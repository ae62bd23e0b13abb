//! bandhop - watch fldigi's VFO and run a command on every band change
//!
//! Usage:
//!   bandhop -c ~/bin/switch-antenna
//!   bandhop -h 192.168.1.20 -p 7362 -i 2s -c ./on-band.sh
//!   bandhop bands
//!   bandhop classify 14074000

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bandhop::config::parse_millis;
use bandhop::{BandhopConfig, CommandNotifier, Monitor};
use bandhop_core::BandTable;
use bandhop_rig::FldigiClient;
use clap::{ArgAction, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "bandhop",
    about = "Run a command whenever fldigi changes amateur band",
    disable_help_flag = true
)]
struct Cli {
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// fldigi host
    #[arg(short = 'h', long)]
    host: Option<String>,

    /// fldigi XML-RPC port
    #[arg(short, long)]
    port: Option<u16>,

    /// Polling interval (e.g. 5s, 500ms, 2m)
    #[arg(short, long, value_parser = parse_millis)]
    interval: Option<Duration>,

    /// External command to run on band change; receives the band name
    #[arg(short, long)]
    command: Option<String>,

    /// Kill the external command after this long (default: wait forever)
    #[arg(long, value_parser = parse_millis)]
    notify_timeout: Option<Duration>,

    /// Band plan file (name:start_mhz:end_mhz per line) replacing the built-in plan
    #[arg(long)]
    bands: Option<PathBuf>,

    /// Path to config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit JSON monitor events on stderr
    #[arg(long)]
    json_events: bool,

    /// Dump default config as TOML and exit
    #[arg(long)]
    dump_config: bool,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand)]
enum Action {
    /// Print the loaded band plan
    Bands,
    /// List the XML-RPC methods fldigi exposes
    Methods,
    /// Print the band a frequency in Hz falls in
    Classify { hz: f64 },
}

impl Cli {
    fn apply(&self, config: &mut BandhopConfig) {
        if let Some(host) = &self.host {
            config.fldigi.host = host.clone();
        }
        if let Some(port) = self.port {
            config.fldigi.port = port;
        }
        if let Some(interval) = self.interval {
            config.monitor.interval_ms = interval.as_millis() as u64;
        }
        if let Some(command) = &self.command {
            config.monitor.command = Some(command.clone());
        }
        if let Some(timeout) = self.notify_timeout {
            config.monitor.notify_timeout_ms = Some(timeout.as_millis() as u64);
        }
        if let Some(bands) = &self.bands {
            config.bands.file = Some(bands.clone());
        }
        if self.json_events {
            config.monitor.json_events = true;
        }
    }
}

fn load_bands(config: &BandhopConfig) -> anyhow::Result<BandTable> {
    config.band_table().context("failed to load band plan")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.dump_config {
        println!("{}", BandhopConfig::default().to_toml());
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bandhop=info,bandhop_core=info,bandhop_rig=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => BandhopConfig::load(path)?,
        None => BandhopConfig::default(),
    };
    cli.apply(&mut config);

    match cli.action {
        Some(Action::Bands) => {
            for r in load_bands(&config)?.iter() {
                println!("{:<8} {:>12.4} - {:<12.4} MHz", r.name, r.start_mhz, r.end_mhz);
            }
            return Ok(());
        }
        Some(Action::Classify { hz }) => {
            println!("{}", load_bands(&config)?.classify(hz));
            return Ok(());
        }
        Some(Action::Methods) => {
            let client = FldigiClient::new(&config.fldigi.host, config.fldigi.port)?;
            let methods = client
                .list_methods()
                .await
                .with_context(|| format!("system.listMethods on {}", client.url()))?;
            println!("Available methods:");
            for m in methods {
                println!("  {m}");
            }
            return Ok(());
        }
        None => {}
    }

    config.validate()?;
    let bands = Arc::new(load_bands(&config)?);
    let command = config.command().unwrap_or_default().to_string();

    let client = FldigiClient::new(&config.fldigi.host, config.fldigi.port)?;
    let notifier = CommandNotifier::new(command).with_timeout(config.notify_timeout());
    let monitor = Monitor::new(
        bands,
        Arc::new(client),
        Arc::new(notifier),
        config.monitor_config(),
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, shutting down");
            ctrl_c.cancel();
        }
    });

    monitor.run(cancel).await;
    Ok(())
}
