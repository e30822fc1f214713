pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flickfeed")]
#[command(about = "Search Flickr's public photo feed from the terminal", long_about = None)]
pub struct Cli {
    /// Override the feed host from the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one search and print the results
    Search {
        /// Tags to search for (empty searches the default term)
        #[arg(default_value = "")]
        query: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Launch the interactive search grid
    Tui,
}
