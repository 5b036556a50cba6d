mod cli;
mod config;
mod error;
mod export;
mod graph;
mod provider;
mod render;
mod view;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing - only show warnings by default, use RUST_LOG=info for more detail
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cli::commands::init::run(force).await?;
        }
        Commands::Viz {
            ref output,
            ref search,
            ref focus,
            no_open,
        } => {
            let config = cli.load_config()?;
            cli::commands::viz::run(
                config,
                output.clone(),
                search.clone(),
                focus.clone(),
                no_open,
            )
            .await?;
        }
        Commands::Explore => {
            cli::commands::explore::run(cli.load_config()?).await?;
        }
        Commands::Stats { top } => {
            cli::commands::stats::run(cli.load_config()?, top).await?;
        }
        Commands::Export { format, ref output } => {
            let config = cli.load_config()?;
            cli::commands::export::run(config, format, output.clone()).await?;
        }
    }

    Ok(())
}
