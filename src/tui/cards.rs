//! Card renderers: one pure function per item variant.
//!
//! No state, no side effects, no error paths. Missing optional fields
//! degrade: an absent volume shows as 0 contracts, an absent quote
//! block is omitted entirely.

use chrono::{DateTime, Utc};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::kalshi::{cents_to_dollars, Event, Item, Market, MarketStatus};

pub fn item_card(item: &Item) -> Vec<Line<'static>> {
    match item {
        Item::Market(market) => market_card(market),
        Item::Event(event) => event_card(event),
    }
}

pub fn market_card(market: &Market) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            market.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            label("Ticker: "),
            Span::raw(market.ticker.clone()),
            Span::raw("   "),
            label("Category: "),
            Span::raw(category_text(market.category.as_deref())),
        ]),
        Line::from(vec![
            label("Status: "),
            status_span(market.status),
            Span::raw("   "),
            label("Closes: "),
            Span::raw(close_time_text(market.close_time)),
        ]),
        Line::from(vec![
            label("Volume: "),
            Span::raw(format!("{} contracts", market.volume_contracts())),
        ]),
    ];

    if market.has_quote() {
        lines.push(Line::from(vec![
            Span::styled("Yes ", Style::default().fg(Color::Green)),
            Span::raw(format!(
                "{} - {}",
                price_text(market.yes_bid),
                price_text(market.yes_ask)
            )),
            Span::raw("   "),
            Span::styled("No ", Style::default().fg(Color::Red)),
            Span::raw(format!(
                "{} - {}",
                price_text(market.no_bid),
                price_text(market.no_ask)
            )),
        ]));
    }

    lines.push(Line::default());
    lines
}

pub fn event_card(event: &Event) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            event.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            label("Event Ticker: "),
            Span::raw(event.event_ticker.clone()),
            Span::raw("   "),
            label("Category: "),
            Span::raw(category_text(event.category.as_deref())),
        ]),
        Line::from(vec![
            label("Markets: "),
            Span::raw(event.market_count.to_string()),
            Span::raw("   "),
            label("Status: "),
            status_span(event.status),
        ]),
        Line::default(),
    ]
}

pub fn status_span(status: MarketStatus) -> Span<'static> {
    let color = match status {
        MarketStatus::Active => Color::Green,
        MarketStatus::Closed => Color::Yellow,
        MarketStatus::Settled => Color::Blue,
        MarketStatus::Other => Color::DarkGray,
    };
    Span::styled(status.label(), Style::default().fg(color))
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::DarkGray))
}

fn category_text(category: Option<&str>) -> String {
    category.unwrap_or("-").to_string()
}

fn close_time_text(close_time: Option<DateTime<Utc>>) -> String {
    match close_time {
        Some(t) => t.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "-".to_string(),
    }
}

fn price_text(cents: Option<i64>) -> String {
    match cents {
        Some(c) => format!("${}", cents_to_dollars(c)),
        None => "-".to_string(),
    }
}
