use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use plantwatch::{Consumer, FileSource, PayloadSource, StreamSource};
use plantwatch_analytics::{Dispatcher, Sink};

#[derive(Parser, Debug)]
#[command(name = "plantwatch")]
#[command(about = "Real-time stall detection and status alerting for manufacturing telemetry")]
struct Args {
    /// Path to a newline-delimited JSON payload log to tail
    #[arg(short, long, default_value = "payloads.ndjson", conflicts_with = "connect")]
    file: PathBuf,

    /// Connect to a TCP endpoint for live payloads (host:port)
    #[arg(short, long)]
    connect: Option<String>,

    /// Poll interval in milliseconds when the source is idle
    #[arg(long, default_value = "250")]
    poll_ms: u64,

    /// Append emitted signals as newline-delimited JSON to this file
    #[arg(long)]
    signals_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let source: Box<dyn PayloadSource> = match args.connect {
        Some(ref addr) => {
            let stream = tokio::net::TcpStream::connect(addr)
                .await
                .map_err(|e| anyhow::anyhow!("failed to connect to {}: {}", addr, e))?;
            info!("connected to {}", addr);
            Box::new(StreamSource::spawn(stream, addr))
        }
        None => Box::new(FileSource::new(&args.file)),
    };

    let mut builder = Dispatcher::builder().sink(Sink::log());
    if let Some(path) = args.signals_out {
        builder = builder.sink(Sink::file(path));
    }
    let dispatcher = builder.build();

    let mut consumer = Consumer::new(source, dispatcher, Duration::from_millis(args.poll_ms));
    info!("consuming payloads from {}", consumer.source_description());

    tokio::select! {
        _ = consumer.run() => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, shutting down");
        }
    }

    info!(
        "processed {} payloads ({} undecodable), final status counts: {:?}",
        consumer.processed(),
        consumer.failed(),
        consumer.dispatcher().tally()
    );

    Ok(())
}
