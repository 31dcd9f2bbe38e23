//! Browser state and its reducer.
//!
//! All view-controller behavior lives here as a pure state machine:
//! key handling and rendering translate to and from [`Action`]s, and
//! the only effect the reducer can demand is a [`FetchRequest`]. Every
//! request carries a sequence number; completions that do not match the
//! latest issued number are dropped, so overlapping fetches always
//! resolve in favor of the most recently issued one.

use tracing::debug;

use crate::kalshi::{Item, Page, ViewType};

/// The three user-selected filters. Empty strings mean "unfiltered".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub view: ViewType,
    pub status: String,
    pub category: String,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            view: ViewType::Markets,
            status: String::new(),
            category: String::new(),
        }
    }
}

/// Everything that can happen to the browser.
#[derive(Debug, Clone)]
pub enum Action {
    /// Any filter or view-type change. Resets items and cursor together.
    FiltersChanged(Filters),
    /// Reset fetch under the current filters.
    Refreshed,
    /// The user asked for the next page.
    LoadMoreRequested,
    /// A fetch task delivered a page.
    FetchSucceeded { seq: u64, page: Page },
    /// A fetch task failed. `message` is already user-presentable.
    FetchFailed { seq: u64, message: String },
}

/// The one effect the reducer can demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub view: ViewType,
    pub status: Option<String>,
    pub category: Option<String>,
    /// `None` requests page one.
    pub cursor: Option<String>,
}

/// View-controller state. Mutated only through [`BrowserState::apply`].
#[derive(Debug)]
pub struct BrowserState {
    pub filters: Filters,
    /// Append-only within a filter session. Never reordered, never
    /// deduplicated.
    pub items: Vec<Item>,
    pub cursor: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    latest_seq: u64,
}

impl BrowserState {
    pub fn new(filters: Filters) -> Self {
        Self {
            filters,
            items: Vec::new(),
            cursor: None,
            loading: false,
            error: None,
            latest_seq: 0,
        }
    }

    /// Whether the "load more" affordance should be offered.
    pub fn can_load_more(&self) -> bool {
        self.cursor.is_some() && !self.loading
    }

    /// Apply one action; returns the fetch the caller must start, if any.
    pub fn apply(&mut self, action: Action) -> Option<FetchRequest> {
        match action {
            Action::FiltersChanged(filters) => {
                self.filters = filters;
                self.reset();
                Some(self.issue(None))
            }
            Action::Refreshed => {
                self.reset();
                Some(self.issue(None))
            }
            Action::LoadMoreRequested => {
                if !self.can_load_more() {
                    return None;
                }
                let cursor = self.cursor.clone();
                Some(self.issue(cursor))
            }
            Action::FetchSucceeded { seq, page } => {
                if seq != self.latest_seq {
                    debug!(seq, latest = self.latest_seq, "Dropping stale fetch result");
                    return None;
                }
                self.loading = false;
                self.items.extend(page.items);
                self.cursor = page.cursor;
                None
            }
            Action::FetchFailed { seq, message } => {
                if seq != self.latest_seq {
                    debug!(seq, latest = self.latest_seq, "Dropping stale fetch failure");
                    return None;
                }
                self.loading = false;
                self.error = Some(message);
                None
            }
        }
    }

    /// Items and cursor always go together; the clear happens before
    /// the request, so a failed reset leaves an empty list.
    fn reset(&mut self) {
        self.items.clear();
        self.cursor = None;
    }

    fn issue(&mut self, cursor: Option<String>) -> FetchRequest {
        self.latest_seq += 1;
        self.loading = true;
        self.error = None;
        FetchRequest {
            seq: self.latest_seq,
            view: self.filters.view,
            status: non_empty(&self.filters.status),
            category: non_empty(&self.filters.category),
            cursor,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kalshi::Market;
    use serde_json::json;

    fn market(ticker: &str) -> Item {
        let market: Market = serde_json::from_value(json!({
            "ticker": ticker,
            "title": format!("{}?", ticker),
        }))
        .unwrap();
        Item::Market(market)
    }

    fn page(tickers: &[&str], cursor: Option<&str>) -> Page {
        Page {
            items: tickers.iter().map(|t| market(t)).collect(),
            cursor: cursor.map(String::from),
        }
    }

    fn filters(view: ViewType, status: &str, category: &str) -> Filters {
        Filters {
            view,
            status: status.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn filter_change_clears_items_and_cursor_before_the_fetch_resolves() {
        let mut state = BrowserState::new(Filters::default());
        let req = state.apply(Action::FiltersChanged(Filters::default())).unwrap();
        state.apply(Action::FetchSucceeded {
            seq: req.seq,
            page: page(&["A", "B"], Some("c1")),
        });
        assert_eq!(state.items.len(), 2);

        let req = state
            .apply(Action::FiltersChanged(filters(ViewType::Markets, "closed", "")))
            .unwrap();

        // Reset happened before the new fetch resolves.
        assert!(state.items.is_empty());
        assert!(state.cursor.is_none());
        assert!(state.loading);
        assert_eq!(req.status.as_deref(), Some("closed"));
        assert!(req.cursor.is_none());
    }

    #[test]
    fn load_more_is_unavailable_without_a_cursor_or_while_loading() {
        let mut state = BrowserState::new(Filters::default());
        assert!(!state.can_load_more());
        assert!(state.apply(Action::LoadMoreRequested).is_none());

        let req = state.apply(Action::Refreshed).unwrap();
        // In flight: a cursor from a previous page would still be hidden.
        assert!(!state.can_load_more());

        state.apply(Action::FetchSucceeded {
            seq: req.seq,
            page: page(&["A"], Some("c1")),
        });
        assert!(state.can_load_more());
    }

    #[test]
    fn reset_fetch_installs_the_page_and_cursor() {
        let mut state = BrowserState::new(Filters::default());
        let req = state.apply(Action::Refreshed).unwrap();

        state.apply(Action::FetchSucceeded {
            seq: req.seq,
            page: page(&["m1", "m2"], Some("c1")),
        });

        let tickers: Vec<_> = state
            .items
            .iter()
            .map(|i| match i {
                Item::Market(m) => m.ticker.clone(),
                Item::Event(e) => e.event_ticker.clone(),
            })
            .collect();
        assert_eq!(tickers, vec!["m1", "m2"]);
        assert_eq!(state.cursor.as_deref(), Some("c1"));
        assert!(!state.loading);
    }

    #[test]
    fn load_more_appends_and_a_null_cursor_ends_pagination() {
        let mut state = BrowserState::new(Filters::default());
        let req = state.apply(Action::Refreshed).unwrap();
        state.apply(Action::FetchSucceeded {
            seq: req.seq,
            page: page(&["m1", "m2"], Some("c1")),
        });

        let req = state.apply(Action::LoadMoreRequested).unwrap();
        assert_eq!(req.cursor.as_deref(), Some("c1"));

        state.apply(Action::FetchSucceeded {
            seq: req.seq,
            page: page(&["m3"], None),
        });

        assert_eq!(state.items.len(), 3);
        assert!(state.cursor.is_none());
        assert!(!state.can_load_more());
    }

    #[test]
    fn failed_load_more_keeps_items_and_surfaces_the_status() {
        let mut state = BrowserState::new(Filters::default());
        let req = state.apply(Action::Refreshed).unwrap();
        state.apply(Action::FetchSucceeded {
            seq: req.seq,
            page: page(&["m1", "m2"], Some("c1")),
        });

        let req = state.apply(Action::LoadMoreRequested).unwrap();
        state.apply(Action::FetchFailed {
            seq: req.seq,
            message: "Kalshi API error (HTTP 500): internal".to_string(),
        });

        assert_eq!(state.items.len(), 2);
        assert!(state.error.as_deref().unwrap().contains("500"));
        assert!(!state.loading);
    }

    #[test]
    fn the_next_fetch_clears_the_error() {
        let mut state = BrowserState::new(Filters::default());
        let req = state.apply(Action::Refreshed).unwrap();
        state.apply(Action::FetchFailed {
            seq: req.seq,
            message: "HTTP request failed: connection refused".to_string(),
        });
        assert!(state.error.is_some());

        state.apply(Action::Refreshed);
        assert!(state.error.is_none());
    }

    #[test]
    fn switching_view_type_discards_items_and_targets_the_other_path() {
        let mut state = BrowserState::new(Filters::default());
        let req = state.apply(Action::Refreshed).unwrap();
        assert_eq!(req.view, ViewType::Markets);
        state.apply(Action::FetchSucceeded {
            seq: req.seq,
            page: page(&["m1"], Some("c1")),
        });

        let req = state
            .apply(Action::FiltersChanged(filters(ViewType::Events, "", "")))
            .unwrap();

        assert!(state.items.is_empty());
        assert_eq!(req.view, ViewType::Events);
        assert!(req.cursor.is_none());
    }

    #[test]
    fn stale_responses_mutate_nothing() {
        let mut state = BrowserState::new(Filters::default());
        let first = state.apply(Action::Refreshed).unwrap();
        // A second fetch is issued before the first resolves.
        let second = state.apply(Action::Refreshed).unwrap();
        assert!(second.seq > first.seq);

        // The slow first response arrives last in wall-clock terms but
        // carries a stale sequence number.
        state.apply(Action::FetchSucceeded {
            seq: first.seq,
            page: page(&["stale"], Some("old-cursor")),
        });
        assert!(state.items.is_empty());
        assert!(state.cursor.is_none());
        assert!(state.loading);

        // Same for a stale failure.
        state.apply(Action::FetchFailed {
            seq: first.seq,
            message: "too late".to_string(),
        });
        assert!(state.error.is_none());

        state.apply(Action::FetchSucceeded {
            seq: second.seq,
            page: page(&["fresh"], None),
        });
        assert_eq!(state.items.len(), 1);
        assert!(!state.loading);
    }
}
