//! fabricsyncd - Fabric Synchronization Daemon
//!
//! Entry point for the fabricsyncd daemon.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use fabricsyncd::SyncConfig;

#[derive(Parser)]
#[command(name = "fabricsyncd", version, about = "Fabric synchronization daemon")]
struct Args {
    /// Path to the daemon configuration file
    #[arg(short, long, default_value = "/etc/fabricsync/fabricsyncd.yaml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initializes tracing/logging subsystem
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    info!("--- Starting fabricsyncd ---");

    let config = match SyncConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        sync_interval = config.sync_interval,
        external_networks = config.external_networks.len(),
        "Configuration loaded"
    );
    for name in config.external_networks.keys() {
        info!(network = %name, "External connectivity configured");
    }

    // TODO: Wire the orchestration event feed and the fabric REST session
    // once their integrations land; the driver, router service, and
    // synchronizers are constructed from this configuration at that point.

    info!("fabricsyncd initialization complete");

    ExitCode::SUCCESS
}
