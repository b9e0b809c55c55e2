mod config;
mod cycle;
mod fsops;
mod repair;
mod scheduler;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use config::load_config;
use fsops::RealFs;
use repair::RepairPolicy;
use scheduler::Scheduler;

/// Polling file-integrity watcher: stats, reads, and touches a single file on
/// a fixed tick, reports content changes and truncation, and optionally
/// restores the last known-good content.
#[derive(Parser, Debug)]
#[command(name = "fiwatcherd", version, about)]
pub struct Cli {
    /// File to watch
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Service tickrate in milliseconds (overrides config)
    #[arg(short = 'T', long)]
    tickrate: Option<u64>,

    /// Revert file if truncated
    #[arg(short = 'F', long)]
    fix: bool,

    /// If file is reverted with -F/--fix, also increment it
    #[arg(short = 'i', long)]
    increment: bool,

    /// Debug output
    #[arg(short = 'D', long)]
    debug: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate config and print resolved settings, don't run
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "fiwatcherd=debug"
    } else {
        "fiwatcherd=info"
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.parse().unwrap()),
        )
        .init();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            std::process::exit(1);
        }
    };
    config.apply_cli(cli.tickrate, cli.fix, cli.increment);
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }

    let policy = RepairPolicy {
        fix: config.watch.fix,
        increment: config.watch.increment,
        step: config.watch.increment_step,
    };
    let interval = Duration::from_millis(config.watch.tick_interval_ms);

    if cli.dry_run {
        println!("fiwatcherd v{}", env!("CARGO_PKG_VERSION"));
        println!("File:      {}", cli.file.display());
        println!("Tickrate:  {} ms", config.watch.tick_interval_ms);
        println!("Fix:       {}", policy.fix);
        println!("Increment: {} (step {})", policy.increment, policy.step);
        println!("Dry run mode — config validated, not running.");
        return;
    }

    tracing::info!(
        file = %cli.file.display(),
        tick_interval_ms = config.watch.tick_interval_ms,
        fix = policy.fix,
        increment = policy.increment,
        "fiwatcherd starting"
    );

    // Runs until the process is terminated externally.
    Scheduler::new(RealFs, cli.file, policy, interval).run().await;
}
