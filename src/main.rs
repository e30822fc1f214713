use std::fs::File;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flickfeed::app::AppContext;
use flickfeed::cli::{commands, Cli, Commands};
use flickfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing. The TUI owns the terminal, so --log moves output to a file.
    match &cli.log {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(EnvFilter::from_default_env())
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    }

    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Search { query, json } => {
            commands::search(&ctx, &query, json).await?;
        }
        Commands::Tui => {
            flickfeed::tui::run(Arc::new(ctx)).await?;
        }
    }

    Ok(())
}
