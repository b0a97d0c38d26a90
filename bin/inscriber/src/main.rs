//! Inscriber service binary entrypoint.

use anyhow::{Result, anyhow};
use argh::from_env;
use inscriber_common::logging;
use inscriber_config::Config;
use tokio::{runtime, signal};
use tracing::{info, warn};

use crate::{args::Args, errors::InitError};

mod args;
mod config;
mod context;
mod errors;
mod rpc;

fn main() -> Result<()> {
    let args: Args = from_env();

    // Load config early to initialize logging with config settings
    let config =
        context::load_config(&args).map_err(|e| anyhow!("Failed to load configuration: {e}"))?;

    // Init runtime
    let rt = runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("inscriber-rt")
        .build()
        .map_err(InitError::RuntimeBuild)?;

    init_logging(&config);

    let sessions = context::init_session_table(&config);

    rt.block_on(async {
        let handle = rpc::start_rpc(&config.rpc, sessions).await?;

        tokio::select! {
            res = signal::ctrl_c() => {
                res?;
                info!("received shutdown signal");
            }
            _ = handle.clone().stopped() => {
                warn!("RPC server stopped unexpectedly");
            }
        }

        // Already stopped is fine here.
        let _ = handle.stop();
        handle.stopped().await;
        Ok::<_, anyhow::Error>(())
    })?;

    info!("Exiting inscriber");
    logging::finalize();
    Ok(())
}

fn init_logging(config: &Config) {
    logging::init_logging_from_config(logging::LoggingInitConfig {
        service_base_name: "inscriber",
        service_label: config.logging.service_label.as_deref(),
        service_version: Some(env!("CARGO_PKG_VERSION")),
        log_dir: config.logging.log_dir.as_ref(),
        log_file_prefix: config.logging.log_file_prefix.as_deref(),
        json_format: config.logging.json_format,
        default_log_prefix: "inscriber",
    });
}
