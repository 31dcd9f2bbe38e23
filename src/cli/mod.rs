//! CLI module for kalview
//!
//! Command-line interface for browsing Kalshi prediction markets. Uses
//! clap for argument parsing and a structured command pattern: one Args
//! and one Command struct per subcommand.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::kalshi::{KALSHI_API_BASE, KALSHI_DEMO_API_BASE};
use crate::logging::{self, LogMode, LoggingConfig};

use commands::browse::{BrowseArgs, BrowseCommand};
use commands::events::{EventsArgs, EventsCommand};
use commands::markets::{MarketsArgs, MarketsCommand};
use commands::version::{VersionArgs, VersionCommand};

#[derive(Parser)]
#[command(name = "kalview")]
#[command(version)]
#[command(about = "Terminal browser for Kalshi prediction markets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use the Kalshi demo environment
    #[arg(long, global = true)]
    pub demo: bool,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List markets as a table
    Markets(MarketsArgs),

    /// List events as a table
    Events(EventsArgs),

    /// Browse markets and events interactively
    Browse(BrowseArgs),

    /// Show version information
    Version(VersionArgs),
}

impl Cli {
    /// Get the API base URL based on the demo flag
    pub fn get_host(&self) -> &'static str {
        if self.demo {
            KALSHI_DEMO_API_BASE
        } else {
            KALSHI_API_BASE
        }
    }

    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let host = self.get_host();
        let data_paths = DataPaths::new(&self.data_dir);

        // Ensure all directories exist
        data_paths.ensure_directories()?;

        // The TUI owns the terminal, so its logs go to file only
        let mode = match &self.command {
            Commands::Browse(_) => LogMode::FileOnly,
            _ => LogMode::ConsoleAndFile,
        };
        let default_filter = if self.verbose > 0 { "debug" } else { "info" };
        logging::init_logging(
            LoggingConfig::new(mode, data_paths.clone()).with_default_filter(default_filter),
        )?;

        match self.command {
            Commands::Markets(args) => MarketsCommand::new(args).execute(host, data_paths).await,
            Commands::Events(args) => EventsCommand::new(args).execute(host, data_paths).await,
            Commands::Browse(args) => BrowseCommand::new(args).execute(host, data_paths).await,
            Commands::Version(args) => VersionCommand::new(args).execute(host, data_paths).await,
        }
    }
}
