//! Tapmill CLI - automated clicker-game session worker
//!
//! Usage:
//!   tapmill init [path]         Write a default tapmill.toml
//!   tapmill run [-c config]     Run one worker per configured identity

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tapmill_client::{BackendClient, StaticMessenger};
use tapmill_core::TapConfig;
use tapmill_engine::Worker;
use tokio::sync::watch;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "tapmill")]
#[command(author, version, about = "Automated clicker-game session worker")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Where to write the config
        #[arg(default_value = "tapmill.toml")]
        path: PathBuf,
    },

    /// Run one worker per configured identity
    Run {
        /// Configuration file to load
        #[arg(short, long, default_value = "tapmill.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    match cli.command {
        Commands::Init { path } => {
            TapConfig::write_default(&path)?;
            info!("wrote default config to {}", path.display());
            Ok(())
        }
        Commands::Run { config } => run(config).await,
    }
}

async fn run(path: PathBuf) -> Result<()> {
    let config = TapConfig::load_or_default(&path)?;
    config.validate()?;

    if config.identities.is_empty() {
        bail!(
            "no identities configured in {}; add an [[identity]] entry",
            path.display()
        );
    }

    let (stop_tx, stop_rx) = watch::channel(false);

    let mut handles = Vec::new();
    for identity in &config.identities {
        let backend = BackendClient::new(&identity.name, identity.proxy.as_deref())?;
        if identity.proxy.is_some() {
            backend.check_proxy().await;
        }

        let messenger = StaticMessenger::new(identity.web_app_url.clone());
        let worker = Worker::new(
            &identity.name,
            config.clone(),
            messenger,
            backend,
            stop_rx.clone(),
        )?;

        // A fatal-identity fault stops this worker only; siblings keep going
        let name = identity.name.clone();
        handles.push(tokio::spawn(async move {
            if let Err(e) = worker.run().await {
                error!("{} | worker exited: {}", name, e);
            }
        }));
    }

    info!("running {} worker(s)", handles.len());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = stop_tx.send(true);
        }
    });

    for handle in handles {
        let _ = handle.await;
    }

    Ok(())
}
