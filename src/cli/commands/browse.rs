//! Interactive browser command

use anyhow::{Context, Result};
use clap::Args;

use crate::data_paths::DataPaths;
use crate::kalshi::{KalshiClient, ViewType};
use crate::tui::{BrowseApp, Filters};

#[derive(Args, Clone)]
pub struct BrowseArgs {
    /// Start on the events view instead of markets
    #[arg(long)]
    pub events: bool,

    /// Initial status filter
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Initial category filter
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

pub struct BrowseCommand {
    args: BrowseArgs,
}

impl BrowseCommand {
    pub fn new(args: BrowseArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, host: &str, _data_paths: DataPaths) -> Result<()> {
        let client = KalshiClient::with_base_url(host).context("Failed to create Kalshi client")?;

        let filters = Filters {
            view: if self.args.events {
                ViewType::Events
            } else {
                ViewType::Markets
            },
            status: self.args.status.clone().unwrap_or_default(),
            category: self.args.category.clone().unwrap_or_default(),
        };

        let mut app = BrowseApp::new(client, filters);
        app.run().await
    }
}
