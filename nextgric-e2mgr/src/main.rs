//! nextgric E2 manager
//!
//! Main binary of the E2 manager. It implements:
//! - CLI argument parsing
//! - Configuration loading and validation
//! - Component wiring and task spawning
//! - Graceful shutdown handling
//!
//! # Usage
//!
//! ```bash
//! e2mgr -c config/e2mgr.yaml
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use nextgric_common::init_logging;
use nextgric_e2mgr::clients::HttpRoutingManagerClient;
use nextgric_e2mgr::managers::SetupRequestPayloads;
use nextgric_e2mgr::{
    load_and_validate_e2mgr_config, ChannelRmrSender, E2ManagerApp, E2ManagerContext, RmrMessage,
    DEFAULT_CHANNEL_CAPACITY,
};
use nextgric_rnib::InMemoryRnib;

/// nextgric E2 manager - RAN to E2 terminator connection lifecycle
#[derive(Parser, Debug)]
#[command(name = "e2mgr")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the E2 manager configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config_file: String,
}

/// Application state for the E2 manager
struct E2mgrBin {
    app: E2ManagerApp,
    /// Drains messages the managers hand to the transport
    outbound: JoinHandle<()>,
}

impl E2mgrBin {
    /// Creates the E2 manager from the given configuration file
    async fn new(config_path: &str) -> Result<Self> {
        let config = load_and_validate_e2mgr_config(config_path)
            .with_context(|| format!("Failed to load configuration from {config_path}"))?;

        // Validated above
        let level = config.logging.level().unwrap_or_default();
        init_logging(level);

        info!("Configuration loaded from: {}", config_path);
        info!(
            "Global RIC id: {} (PLMN {}-{})",
            config.global_ric_id.ric_id, config.global_ric_id.mcc, config.global_ric_id.mnc
        );
        info!(
            "Routing manager: {}, max connection attempts: {}",
            config.routing_manager.base_url, config.max_connection_attempts
        );

        let rnib = Arc::new(InMemoryRnib::with_channels(
            config.rnib_writer.state_change_message_channel.clone(),
            config.rnib_writer.ran_manipulation_message_channel.clone(),
        ));
        let rm_client = HttpRoutingManagerClient::new(&config.routing_manager)
            .context("Failed to create routing manager client")?;

        let (tx, mut rx) = mpsc::channel::<RmrMessage>(DEFAULT_CHANNEL_CAPACITY);
        let outbound = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                debug!(
                    "Outbound {} for RAN {} ({} bytes)",
                    msg.msg_type,
                    msg.ran_name,
                    msg.payload.len()
                );
            }
        });

        let context = E2ManagerContext::new(
            &config,
            rnib,
            Arc::new(rm_client),
            Arc::new(ChannelRmrSender::new(tx)),
            SetupRequestPayloads::default(),
        )
        .context("Invalid configuration")?;

        let app = E2ManagerApp::start(context)
            .await
            .context("Failed to start E2 manager")?;

        Ok(Self { app, outbound })
    }

    /// Runs until Ctrl+C
    async fn run(&mut self) -> Result<()> {
        info!("E2 manager started, waiting for shutdown signal...");

        signal::ctrl_c()
            .await
            .context("Failed to listen for shutdown signal")?;
        info!("Received Ctrl+C, initiating shutdown...");

        Ok(())
    }

    /// Performs graceful shutdown of all tasks
    async fn shutdown(self) -> Result<()> {
        let Self { app, outbound } = self;
        app.shutdown().await;
        outbound.abort();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    println!("nextgric E2 manager");
    println!("===================");

    match run_e2mgr(args).await {
        Ok(()) => {
            info!("E2 manager exited successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("E2 manager failed: {:#}", e);
            eprintln!("E2 manager failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Main E2 manager execution logic
async fn run_e2mgr(args: Args) -> Result<()> {
    let mut bin = E2mgrBin::new(&args.config_file).await?;

    bin.run().await?;

    bin.shutdown().await?;

    Ok(())
}
