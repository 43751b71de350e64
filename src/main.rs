//! weatherhub - caching proxy services for geocoding, weather and forecasts
//!
//! Starts each selected service on its own port and runs them until the
//! process is stopped or one of them fails.

use clap::Parser;
use futures::future::try_join_all;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use weatherhub::cli::Cli;
use weatherhub::config::Config;
use weatherhub::services::{build_router, serve};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_cli(cli)?;
    tracing::info!(
        "Starting {} service(s), data in {}",
        config.services.len(),
        config.data_dir.display()
    );

    let mut servers = Vec::with_capacity(config.services.len());
    for &kind in &config.services {
        let router = build_router(kind, &config)?;
        servers.push(serve(kind, config.addr_for(kind), router));
    }

    try_join_all(servers).await?;
    Ok(())
}
