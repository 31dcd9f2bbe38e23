//! Kalshi API wire types
//!
//! These types mirror the JSON bodies returned by the Kalshi trade API.
//! They are display-only: nothing in this program constructs or mutates
//! them after deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kalshi API error types
#[derive(Debug, thiserror::Error)]
pub enum KalshiError {
    /// The API answered with a non-2xx status.
    #[error("Kalshi API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// The request never produced a usable response (connect, timeout,
    /// body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected envelope.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which record collection is being browsed.
///
/// Selects both the API path segment and the envelope key the item
/// array lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Markets,
    Events,
}

impl ViewType {
    /// Path segment and envelope key, e.g. `/markets`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Markets => "markets",
            ViewType::Events => "events",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewType::Markets => "Markets",
            ViewType::Events => "Events",
        }
    }

    pub fn all() -> &'static [ViewType] {
        &[ViewType::Markets, ViewType::Events]
    }

    pub fn toggled(&self) -> ViewType {
        match self {
            ViewType::Markets => ViewType::Events,
            ViewType::Events => ViewType::Markets,
        }
    }
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market lifecycle status
///
/// Anything the API sends outside the three known states collapses to
/// `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Active,
    Closed,
    Settled,
    #[serde(other)]
    Other,
}

impl Default for MarketStatus {
    fn default() -> Self {
        MarketStatus::Other
    }
}

impl MarketStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MarketStatus::Active => "active",
            MarketStatus::Closed => "closed",
            MarketStatus::Settled => "settled",
            MarketStatus::Other => "other",
        }
    }
}

impl std::fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A Kalshi market from the API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Market {
    /// Market ticker (unique identifier)
    pub ticker: String,

    /// Market title
    pub title: String,

    /// Category
    #[serde(default)]
    pub category: Option<String>,

    /// When the market closes
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,

    /// Market status
    #[serde(default)]
    pub status: MarketStatus,

    /// Contracts traded
    #[serde(default)]
    pub volume: Option<i64>,

    /// Current YES bid in cents (1-99)
    #[serde(default)]
    pub yes_bid: Option<i64>,

    /// Current YES ask in cents
    #[serde(default)]
    pub yes_ask: Option<i64>,

    /// Current NO bid in cents
    #[serde(default)]
    pub no_bid: Option<i64>,

    /// Current NO ask in cents
    #[serde(default)]
    pub no_ask: Option<i64>,
}

impl Market {
    /// Volume with the API's "absent means zero" convention applied.
    pub fn volume_contracts(&self) -> i64 {
        self.volume.unwrap_or(0)
    }

    /// Whether the market carries a displayable quote block.
    ///
    /// Keyed on `yes_bid` alone: a market that has never traded omits
    /// the whole block rather than sending four nulls.
    pub fn has_quote(&self) -> bool {
        self.yes_bid.is_some()
    }
}

/// A Kalshi event from the API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Event {
    /// Event ticker (unique identifier)
    pub event_ticker: String,

    /// Event title
    pub title: String,

    /// Category
    #[serde(default)]
    pub category: Option<String>,

    /// Number of markets under this event
    #[serde(default)]
    pub market_count: i64,

    /// Event status
    #[serde(default)]
    pub status: MarketStatus,
}

/// Response from GET /markets
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsPage {
    pub markets: Vec<Market>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Response from GET /events
#[derive(Debug, Clone, Deserialize)]
pub struct EventsPage {
    pub events: Vec<Event>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// One displayable record, tagged by view type.
#[derive(Debug, Clone)]
pub enum Item {
    Market(Market),
    Event(Event),
}

impl Item {
    pub fn title(&self) -> &str {
        match self {
            Item::Market(m) => &m.title,
            Item::Event(e) => &e.title,
        }
    }
}

/// A view-type-agnostic page, ready for the browser state.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Item>,
    /// `None` means last page. The client has already normalized the
    /// API's empty-string form away.
    pub cursor: Option<String>,
}

/// Convert a cent price to dollars (45 -> 0.45).
pub fn cents_to_dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn market_deserializes_with_sparse_fields() {
        let market: Market = serde_json::from_value(json!({
            "ticker": "KXFED-25DEC",
            "title": "Will the Fed cut rates in December?"
        }))
        .unwrap();

        assert_eq!(market.status, MarketStatus::Other);
        assert_eq!(market.volume_contracts(), 0);
        assert!(!market.has_quote());
        assert!(market.close_time.is_none());
    }

    #[test]
    fn market_status_maps_known_and_unknown_values() {
        let market: Market = serde_json::from_value(json!({
            "ticker": "T",
            "title": "t",
            "status": "settled"
        }))
        .unwrap();
        assert_eq!(market.status, MarketStatus::Settled);

        let market: Market = serde_json::from_value(json!({
            "ticker": "T",
            "title": "t",
            "status": "initialized"
        }))
        .unwrap();
        assert_eq!(market.status, MarketStatus::Other);
    }

    #[test]
    fn events_page_cursor_defaults_to_none() {
        let page: EventsPage = serde_json::from_value(json!({
            "events": [{
                "event_ticker": "KXELON",
                "title": "Elon events",
                "market_count": 4,
                "status": "active"
            }]
        }))
        .unwrap();

        assert_eq!(page.events.len(), 1);
        assert_eq!(page.events[0].market_count, 4);
        assert!(page.cursor.is_none());
    }

    #[test]
    fn cents_convert_to_dollars() {
        assert_eq!(cents_to_dollars(45), dec!(0.45));
        assert_eq!(cents_to_dollars(100), dec!(1.00));
        assert_eq!(cents_to_dollars(7), dec!(0.07));
    }
}
