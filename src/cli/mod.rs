pub mod commands;

use anyhow::Result;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::graph::theme::ThemePreference;

#[derive(Parser)]
#[command(name = "crossnet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Explore the subreddit crosspost network from the terminal or the browser", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the analytics API
    #[arg(long, global = true, env = "CROSSNET_API_URL")]
    pub api_url: Option<String>,

    /// Read analytics artefacts from a local directory instead of the API
    #[arg(long, global = true, env = "CROSSNET_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Color scheme for rendered output
    #[arg(long, global = true)]
    pub theme: Option<ThemePreference>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration file (or defaults) with command-line overrides applied
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_or_default()?;
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long, default_value = "false")]
        force: bool,
    },

    /// Render the network to an HTML page and open it in the browser
    Viz {
        /// Where to write the page (defaults to the temp directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Highlight nodes matching this text
        #[arg(short, long)]
        search: Option<String>,

        /// Select a node and centre the view on it
        #[arg(short, long)]
        focus: Option<String>,

        /// Write the page without launching a browser
        #[arg(long, default_value = "false")]
        no_open: bool,
    },

    /// Interactively search and inspect the network from stdin
    Explore,

    /// Show network statistics and the top crossposting subreddits
    Stats {
        /// Number of entries to list in each ranking
        #[arg(short, long, default_value = "5")]
        top: usize,
    },

    /// Export the network to a file
    Export {
        /// Export format
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Json,
    Graphml,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Graphml => write!(f, "graphml"),
        }
    }
}
