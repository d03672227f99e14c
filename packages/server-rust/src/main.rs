//! `clearword-server` binary: parses the CLI, installs logging, and serves
//! until ctrl-c.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use clearword_server::{EchoProcessor, MemoryStore, NetworkConfig, NetworkModule};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Clearword - text simplification and accessibility preferences API
#[derive(Debug, Parser)]
#[command(name = "clearword-server", version, about, long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "CLEARWORD_HOST", default_value = "localhost")]
    host: String,

    /// Port to listen on (0 picks a free port)
    #[arg(long, env = "CLEARWORD_PORT", default_value_t = 5000)]
    port: u16,

    /// Allowed CORS origin; repeat or comma-separate. `*` allows any
    #[arg(
        long = "cors-origin",
        env = "CLEARWORD_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    cors_origins: Vec<String>,

    /// Log output format
    #[arg(long, env = "CLEARWORD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl Cli {
    fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
            ..NetworkConfig::default()
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let mut module = NetworkModule::new(
        cli.network_config(),
        Arc::new(MemoryStore::new()),
        Arc::new(EchoProcessor),
    );
    let port = module.start().await?;
    info!(host = %cli.host, port, "Clearword server listening");

    module.serve(shutdown_signal()).await
}
