//! STOMP handshake CLI binary.
//!
//! Opens a TCP connection to a broker, performs the CONNECT/CONNECTED
//! handshake and prints the negotiated session.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use stomp::{
    config::{parse_heart_beat_config, ClientConfig},
    connect, StompError, VERSION,
};
use tokio::net::TcpStream;

#[derive(Parser)]
#[command(name = "stomp-connect")]
#[command(version = VERSION)]
#[command(about = "Negotiate a STOMP session with a broker and print it", long_about = None)]
struct Cli {
    /// Broker address (host:port)
    #[arg(short, long)]
    broker: Option<String>,

    /// Login
    #[arg(short, long)]
    login: Option<String>,

    /// Passcode
    #[arg(short, long)]
    passcode: Option<String>,

    /// Virtual host (default: broker host)
    #[arg(long)]
    host: Option<String>,

    /// Requested heart-beat as outgoing,incoming milliseconds
    #[arg(long)]
    heart_beat: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(short, long, default_value = "10")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    tracing::info!(broker = %config.broker_addr(), "connecting");

    let deadline = Duration::from_secs(cli.timeout_secs);
    let session = tokio::time::timeout(deadline, async {
        let stream = TcpStream::connect(config.broker_addr()).await?;
        Ok::<_, StompError>(connect(stream, config.header_options()).await?)
    })
    .await
    .map_err(|_| {
        anyhow::anyhow!("Handshake with {} timed out after {:?}", config.broker_addr(), deadline)
    })??;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(session.info())?);
    } else {
        println!("Version:    {}", session.version());
        println!("Session:    {}", session.id());
        println!("Server:     {}", session.server());
        println!("Heart-beat: {}", session.heart_beat());
    }

    let (_, mut writer, processor) = session.into_parts();
    processor.stop().await;
    if let Err(e) = writer.shutdown().await {
        tracing::debug!(error = %e, "connection shutdown failed");
    }

    Ok(())
}

/// File config, then environment, then command-line flags; later wins.
fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    let config = config.merge(ClientConfig::from_env()?);

    let flags = ClientConfig {
        broker: cli.broker.clone(),
        login: cli.login.clone(),
        passcode: cli.passcode.clone(),
        host: cli.host.clone(),
        accept_version: None,
        heart_beat: cli
            .heart_beat
            .as_deref()
            .map(parse_heart_beat_config)
            .transpose()?,
    };

    Ok(config.merge(flags))
}
