use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use readlog::application::{ServerConfig, serve};
use readlog::infrastructure::client::ReadlogClient;
use readlog::presentation::cli::{Cli, Commands, ServeCommand, library, stats};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => run_server(cmd).await,
        Commands::Stats(cmd) => stats::run(cmd),
        Commands::Library { command } => {
            let client = ReadlogClient::from_base_url(&cli.api_url)?;
            library::run(&client, command).await
        }
    }
}

async fn run_server(command: ServeCommand) -> Result<()> {
    let config = ServerConfig {
        bind_address: command.bind_address,
        stats_debounce: Duration::from_millis(command.stats_debounce_ms),
    };

    serve(config).await
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    // Logs go to stderr so command output on stdout stays machine-readable.
    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
