use anyhow::Result;
use clap::Parser;

use comdash::application::{CommandExecutor, Commands};
use comdash::config::Config;

#[derive(Parser)]
#[command(version, about = "Commodity price dashboard with terminal market data")]
struct Cli {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Terminal gateway endpoint (overrides config)
    #[arg(long)]
    endpoint: Option<String>,

    /// Snapshot log directory (overrides config)
    #[arg(long)]
    log_dir: Option<String>,

    /// Disable the synthetic data fallback
    #[arg(long)]
    no_synthetic_fallback: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comdash=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load base configuration from file if provided
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    // CLI args have higher priority than the config file
    if let Some(endpoint) = cli.endpoint {
        config.source.endpoint = Some(endpoint);
    }
    if let Some(log_dir) = cli.log_dir {
        config.logging.log_dir = log_dir;
    }
    if cli.no_synthetic_fallback {
        config.source.synthetic_fallback = false;
    }

    CommandExecutor::execute(cli.command, config).await?;
    Ok(())
}
