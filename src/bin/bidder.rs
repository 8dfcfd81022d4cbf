//! A bidder process: announces itself, logs every dispatched workload
//! fragment it receives, and runs until interrupted.

use clap::Parser;
use pacer::bidder::Bidder;
use pacer::config::Config;
use pacer::Result;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Budget-pacing bidder", long_about = None)]
struct Args {
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

    let broker = connect_broker(&config.broker_url).await?;
    let bidder = Bidder::start(broker, &config, |fragments| {
        tracing::info!(line_items = fragments.len(), "received workload fragment");
    })
    .await?;
    tracing::info!(address = bidder.address(), "bidder announcing");

    tokio::signal::ctrl_c().await.map_err(pacer::Error::Io)?;
    tracing::info!("shutdown signal received");
    bidder.stop().await;
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
