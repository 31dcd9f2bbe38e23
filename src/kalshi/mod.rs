//! Kalshi trade API: wire types and the HTTP client.

pub mod client;
pub mod types;

pub use client::{
    KalshiClient, ListQuery, DEFAULT_PAGE_LIMIT, KALSHI_API_BASE, KALSHI_DEMO_API_BASE, MAX_PAGES,
};
pub use types::{
    cents_to_dollars, Event, EventsPage, Item, KalshiError, Market, MarketStatus, MarketsPage,
    Page, ViewType,
};
