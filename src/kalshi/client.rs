//! Kalshi API client
//!
//! One HTTP attempt per call: no retry, no backoff, no cancellation.
//! Callers that want multiple pages follow the cursor themselves or use
//! the `list_all_*` helpers.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{
    Event, EventsPage, Item, KalshiError, Market, MarketsPage, Page, ViewType,
};

/// Base URL for the Kalshi trade API
pub const KALSHI_API_BASE: &str = "https://api.elections.kalshi.com/trade-api/v2";
pub const KALSHI_DEMO_API_BASE: &str = "https://demo-api.kalshi.co/trade-api/v2";

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Safety cap for cursor-following fetches. The API has no documented
/// bound on chain length and a misbehaving cursor must not loop forever.
pub const MAX_PAGES: usize = 50;

/// Query parameters for the list endpoints. Empty strings mean
/// "unfiltered" and are not sent.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Kalshi API client
#[derive(Clone)]
pub struct KalshiClient {
    client: Client,
    base_url: String,
}

impl KalshiClient {
    /// Create a client against the public or demo environment.
    pub fn new(use_demo: bool) -> Result<Self, KalshiError> {
        let base_url = if use_demo {
            KALSHI_DEMO_API_BASE
        } else {
            KALSHI_API_BASE
        };
        Self::with_base_url(base_url)
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, KalshiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, view: ViewType, query: &ListQuery) -> String {
        let mut url = format!(
            "{}/{}?limit={}",
            self.base_url,
            view.as_str(),
            query.limit.unwrap_or(DEFAULT_PAGE_LIMIT)
        );

        if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
            url.push_str(&format!("&status={}", status));
        }
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            url.push_str(&format!("&category={}", category));
        }
        if let Some(cursor) = query.cursor.as_deref().filter(|c| !c.is_empty()) {
            url.push_str(&format!("&cursor={}", cursor));
        }

        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, KalshiError> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(KalshiError::Api { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// List one page of markets.
    pub async fn list_markets(&self, query: &ListQuery) -> Result<MarketsPage, KalshiError> {
        let url = self.build_url(ViewType::Markets, query);
        let mut page: MarketsPage = self.get_json(&url).await?;
        page.cursor = normalize_cursor(page.cursor);
        Ok(page)
    }

    /// List one page of events.
    pub async fn list_events(&self, query: &ListQuery) -> Result<EventsPage, KalshiError> {
        let url = self.build_url(ViewType::Events, query);
        let mut page: EventsPage = self.get_json(&url).await?;
        page.cursor = normalize_cursor(page.cursor);
        Ok(page)
    }

    /// Fetch one page of whichever collection `view` selects, as
    /// display-ready items.
    pub async fn fetch_page(&self, view: ViewType, query: &ListQuery) -> Result<Page, KalshiError> {
        match view {
            ViewType::Markets => {
                let page = self.list_markets(query).await?;
                Ok(Page {
                    items: page.markets.into_iter().map(Item::Market).collect(),
                    cursor: page.cursor,
                })
            }
            ViewType::Events => {
                let page = self.list_events(query).await?;
                Ok(Page {
                    items: page.events.into_iter().map(Item::Event).collect(),
                    cursor: page.cursor,
                })
            }
        }
    }

    /// Follow the markets cursor until it is exhausted or `max_pages`
    /// is hit.
    pub async fn list_all_markets(
        &self,
        query: &ListQuery,
        max_pages: usize,
    ) -> Result<Vec<Market>, KalshiError> {
        let mut all_markets = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > max_pages {
                warn!(
                    "Reached maximum page limit ({}) for markets fetch, stopping",
                    max_pages
                );
                break;
            }

            let page_query = ListQuery {
                cursor: cursor.clone(),
                ..query.clone()
            };
            let page = self.list_markets(&page_query).await?;
            all_markets.extend(page.markets);

            match page.cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        debug!("Fetched {} markets in {} pages", all_markets.len(), page_count);
        Ok(all_markets)
    }

    /// Follow the events cursor until it is exhausted or `max_pages`
    /// is hit.
    pub async fn list_all_events(
        &self,
        query: &ListQuery,
        max_pages: usize,
    ) -> Result<Vec<Event>, KalshiError> {
        let mut all_events = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > max_pages {
                warn!(
                    "Reached maximum page limit ({}) for events fetch, stopping",
                    max_pages
                );
                break;
            }

            let page_query = ListQuery {
                cursor: cursor.clone(),
                ..query.clone()
            };
            let page = self.list_events(&page_query).await?;
            all_events.extend(page.events);

            match page.cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        debug!("Fetched {} events in {} pages", all_events.len(), page_count);
        Ok(all_events)
    }
}

/// The API signals "last page" with either null or an empty string.
fn normalize_cursor(cursor: Option<String>) -> Option<String> {
    cursor.filter(|c| !c.is_empty())
}

impl std::fmt::Debug for KalshiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KalshiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> KalshiClient {
        KalshiClient::with_base_url(server.uri()).unwrap()
    }

    #[tokio::test]
    async fn list_markets_parses_envelope_and_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "markets": [
                    {"ticker": "KXFED-25DEC", "title": "Fed cut?", "status": "active",
                     "volume": 1200, "yes_bid": 45, "yes_ask": 47, "no_bid": 53, "no_ask": 55},
                    {"ticker": "KXCPI-25NOV", "title": "CPI above 3%?", "status": "closed"}
                ],
                "cursor": "c1"
            })))
            .mount(&server)
            .await;

        let page = test_client(&server)
            .list_markets(&ListQuery::default())
            .await
            .unwrap();

        assert_eq!(page.markets.len(), 2);
        assert_eq!(page.markets[0].yes_bid, Some(45));
        assert!(page.markets[0].has_quote());
        assert!(!page.markets[1].has_quote());
        assert_eq!(page.cursor.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn filters_and_cursor_become_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets"))
            .and(query_param("limit", "50"))
            .and(query_param("status", "active"))
            .and(query_param("category", "Politics"))
            .and(query_param("cursor", "abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"markets": [], "cursor": null})),
            )
            .mount(&server)
            .await;

        let query = ListQuery {
            status: Some("active".to_string()),
            category: Some("Politics".to_string()),
            cursor: Some("abc".to_string()),
            limit: None,
        };
        let page = test_client(&server).list_markets(&query).await.unwrap();
        assert!(page.markets.is_empty());
        assert!(page.cursor.is_none());
    }

    #[tokio::test]
    async fn empty_filters_are_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [], "cursor": ""
            })))
            .mount(&server)
            .await;

        let query = ListQuery {
            status: Some(String::new()),
            category: Some(String::new()),
            cursor: Some(String::new()),
            limit: Some(25),
        };
        let client = test_client(&server);
        let url = client.build_url(ViewType::Events, &query);
        assert_eq!(url, format!("{}/events?limit=25", server.uri()));

        // Empty-string cursor from the API normalizes to None.
        let page = client.list_events(&query).await.unwrap();
        assert!(page.cursor.is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error_with_the_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .list_markets(&ListQuery::default())
            .await
            .unwrap_err();

        match &err {
            KalshiError::Api { status, .. } => assert_eq!(*status, 500),
            other => panic!("expected Api error, got {:?}", other),
        }
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .list_markets(&ListQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, KalshiError::Parse(_)));
    }

    #[tokio::test]
    async fn fetch_page_tags_items_by_view_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [{"event_ticker": "KXELON", "title": "Elon", "market_count": 3}],
                "cursor": null
            })))
            .mount(&server)
            .await;

        let page = test_client(&server)
            .fetch_page(ViewType::Events, &ListQuery::default())
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert!(matches!(&page.items[0], Item::Event(e) if e.market_count == 3));
    }

    #[tokio::test]
    async fn list_all_markets_follows_the_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/markets"))
            .and(query_param("cursor", "next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "markets": [{"ticker": "B", "title": "b"}],
                "cursor": null
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "markets": [{"ticker": "A", "title": "a"}],
                "cursor": "next"
            })))
            .mount(&server)
            .await;

        let markets = test_client(&server)
            .list_all_markets(&ListQuery::default(), MAX_PAGES)
            .await
            .unwrap();

        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].ticker, "A");
        assert_eq!(markets[1].ticker, "B");
    }

    #[tokio::test]
    async fn list_all_markets_respects_the_page_cap() {
        let server = MockServer::start().await;
        // Always hands back a cursor; without the cap this would never end.
        Mock::given(method("GET"))
            .and(path("/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "markets": [{"ticker": "A", "title": "a"}],
                "cursor": "again"
            })))
            .mount(&server)
            .await;

        let markets = test_client(&server)
            .list_all_markets(&ListQuery::default(), 3)
            .await
            .unwrap();

        assert_eq!(markets.len(), 3);
    }
}
