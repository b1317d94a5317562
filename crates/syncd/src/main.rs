//! syncd entry point.
//!
//! Runs one hard reinit of a persisted ASIC state snapshot against the
//! virtual line card and writes the resulting translations.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use sonic_lai::{LaiMetadata, StaticLaiMetadata};
use sonic_lai_vs::VirtualLai;
use sonic_syncd::audit::{init_logging, init_logging_pretty};
use sonic_syncd::{
    AsicStateSnapshot, BoardModePoller, NotificationHandler, SingleReiniter, SyncdConfig,
    SyncdError,
};

/// SONiC OTN line-card sync daemon
#[derive(Parser, Debug)]
#[command(name = "syncd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Persisted ASIC state snapshot (JSON)
    #[arg(short = 's', long)]
    snapshot: PathBuf,

    /// Write the snapshot with the new translations here instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Human-readable log output instead of JSON
    #[arg(long)]
    pretty_log: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.pretty_log {
        init_logging_pretty(&args.log_level);
    } else {
        init_logging(&args.log_level);
    }

    info!("Starting SONiC OTN syncd");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("syncd failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SyncdError> {
    let config = match &args.config {
        Some(path) => SyncdConfig::load(path)?,
        None => {
            warn!("No config file given, using defaults");
            SyncdConfig::default()
        }
    };
    info!(
        "Global context: {}, configured linecards: {}",
        config.global_context,
        config.linecards.len()
    );

    let metadata: Arc<dyn LaiMetadata> = Arc::new(StaticLaiMetadata);
    let notifications = Arc::new(NotificationHandler::new());
    let lai = VirtualLai::new(
        config.global_context,
        Arc::new(config.linecard_container()),
        Arc::clone(&metadata),
    )
    .map_err(|e| SyncdError::config(e.to_string()))?
    .with_notification_sink(notifications.clone());

    let mut snapshot = AsicStateSnapshot::load(&args.snapshot)?;
    info!(
        "Loaded {} objects from {}",
        snapshot.asic_state.len(),
        args.snapshot.display()
    );

    let reiniter = SingleReiniter::new(Arc::new(lai), metadata, Arc::clone(&notifications))
        .with_board_mode_poller(BoardModePoller::from_config(&config.board_mode));
    let result = reiniter.hard_reinit(&snapshot)?;

    info!(
        "Hard reinit complete: {} translations, {} created, {} matched",
        result.translated.len(),
        result.stats.total_creates(),
        result.stats.matched
    );
    for notification in notifications.drain() {
        info!("Pending notification: {:?}", notification);
    }

    snapshot.store_translations(&result.translated);
    let content = snapshot.to_json_pretty()?;
    match &args.output {
        Some(path) => {
            fs::write(path, content)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
