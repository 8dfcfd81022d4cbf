//! The controller process: loads a line-item snapshot and dispatches
//! per-minute workload fragments to the announcing bidder fleet until
//! interrupted.

use clap::Parser;
use pacer::config::Config;
use pacer::controller::Controller;
use pacer::Result;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Budget-pacing controller", long_about = None)]
struct Args {
    /// Path to the newline-delimited JSON line-item snapshot to load.
    snapshot_path: PathBuf,

    /// Set the verbosity level.
    #[arg(short, long, default_value = "info")]
    verbosity: String,

    /// Broker connection URL, overriding PACER_BROKER_URL.
    #[arg(long)]
    broker_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    use tracing_subscriber::{fmt, EnvFilter};
    fmt().with_env_filter(EnvFilter::new(&args.verbosity)).init();

    let mut config = Config::from_env();
    if let Some(url) = args.broker_url {
        config.broker_url = url;
    }

    tracing::info!(snapshot_path = %args.snapshot_path.display(), "starting controller");

    let broker = connect_broker(&config.broker_url).await?;
    let controller = Controller::start(broker, &config, &args.snapshot_path).await?;

    tokio::signal::ctrl_c()
        .await
        .map_err(pacer::Error::Io)?;
    tracing::info!("shutdown signal received");
    controller.shutdown().await;
    Ok(())
}

#[cfg(feature = "broker-nats")]
async fn connect_broker(url: &str) -> Result<Arc<dyn pacer::broker::Broker>> {
    let broker = pacer::broker::NatsBroker::connect(url).await?;
    Ok(Arc::new(broker))
}

#[cfg(not(feature = "broker-nats"))]
async fn connect_broker(_url: &str) -> Result<Arc<dyn pacer::broker::Broker>> {
    tracing::warn!("broker-nats feature disabled, falling back to an in-process broker");
    Ok(Arc::new(pacer::broker::InMemoryBroker::new()))
}
