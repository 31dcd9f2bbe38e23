//! Events listing command

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::cli::commands::markets::{page_spinner, status_cell};
use crate::data_paths::DataPaths;
use crate::kalshi::{Event, KalshiClient, ListQuery, MAX_PAGES};

#[derive(Args, Clone)]
pub struct EventsArgs {
    /// Filter by event status
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

pub struct EventsCommand {
    args: EventsArgs,
}

impl EventsCommand {
    pub fn new(args: EventsArgs) -> Self {
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

        let (events, remaining_cursor) = if self.args.all {
            let spinner = page_spinner("Fetching events...");
            let events = client
                .list_all_events(&query, self.args.max_pages)
                .await
                .context("Failed to fetch events")?;
            spinner.finish_and_clear();
            (events, None)
        } else {
            let page = client
                .list_events(&query)
                .await
                .context("Failed to fetch events")?;
            (page.events, page.cursor)
        };

        print_events_table(&events);

        println!(
            "\n{} {}",
            events.len().to_string().bright_green(),
            "events".bright_green()
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

fn print_events_table(events: &[Event]) {
    if events.is_empty() {
        println!("{}", "No events match the current filters".bright_black());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Event Ticker", "Title", "Category", "Markets", "Status"]);

    for event in events {
        table.add_row(vec![
            event.event_ticker.clone(),
            event.title.clone(),
            event.category.clone().unwrap_or_else(|| "-".to_string()),
            event.market_count.to_string(),
            status_cell(event.status),
        ]);
    }

    println!("{table}");
}
