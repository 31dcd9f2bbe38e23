//! Markets listing command

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::data_paths::DataPaths;
use crate::kalshi::{KalshiClient, ListQuery, Market, MarketStatus, MAX_PAGES};

#[derive(Args, Clone)]
pub struct MarketsArgs {
    /// Filter by market status (active, closed, settled)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Filter by category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Page size requested from the API
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: u32,

    /// Follow pagination cursors until exhausted
    #[arg(long)]
    pub all: bool,

    /// Safety cap on pages fetched with --all
    #[arg(long, default_value_t = MAX_PAGES)]
    pub max_pages: usize,
}

pub struct MarketsCommand {
    args: MarketsArgs,
}

impl MarketsCommand {
    pub fn new(args: MarketsArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, host: &str, _data_paths: DataPaths) -> Result<()> {
        let client = KalshiClient::with_base_url(host).context("Failed to create Kalshi client")?;
        let query = ListQuery {
            status: self.args.status.clone(),
            category: self.args.category.clone(),
            cursor: None,
            limit: Some(self.args.limit),
        };

        let (markets, remaining_cursor) = if self.args.all {
            let spinner = page_spinner("Fetching markets...");
            let markets = client
                .list_all_markets(&query, self.args.max_pages)
                .await
                .context("Failed to fetch markets")?;
            spinner.finish_and_clear();
            (markets, None)
        } else {
            let page = client
                .list_markets(&query)
                .await
                .context("Failed to fetch markets")?;
            (page.markets, page.cursor)
        };

        print_markets_table(&markets);

        println!(
            "\n{} {}",
            markets.len().to_string().bright_green(),
            "markets".bright_green()
        );
        if remaining_cursor.is_some() {
            println!(
                "{}",
                "More pages available, re-run with --all to fetch them".bright_black()
            );
        }

        Ok(())
    }
}

fn print_markets_table(markets: &[Market]) {
    if markets.is_empty() {
        println!("{}", "No markets match the current filters".bright_black());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Ticker", "Title", "Category", "Status", "Closes", "Volume", "Yes", "No",
        ]);

    for market in markets {
        table.add_row(vec![
            market.ticker.clone(),
            truncate(&market.title, 48),
            market.category.clone().unwrap_or_else(|| "-".to_string()),
            status_cell(market.status),
            market
                .close_time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            market.volume_contracts().to_string(),
            quote_cell(market.yes_bid, market.yes_ask),
            quote_cell(market.no_bid, market.no_ask),
        ]);
    }

    println!("{table}");
}

pub(super) fn status_cell(status: MarketStatus) -> String {
    match status {
        MarketStatus::Active => status.label().bright_green().to_string(),
        MarketStatus::Closed => status.label().bright_yellow().to_string(),
        MarketStatus::Settled => status.label().bright_blue().to_string(),
        MarketStatus::Other => status.label().bright_black().to_string(),
    }
}

pub(super) fn page_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("static spinner template"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn quote_cell(bid: Option<i64>, ask: Option<i64>) -> String {
    match (bid, ask) {
        (Some(bid), Some(ask)) => format!("{}¢/{}¢", bid, ask),
        (Some(bid), None) => format!("{}¢/-", bid),
        _ => "-".to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
