//! Interactive browser application.
//!
//! Owns the reducer state and the terminal lifecycle. Key presses are
//! translated into [`Action`]s; every fetch the reducer demands runs on
//! its own tokio task and reports back over a channel tagged with the
//! request's sequence number, so a slow response can never clobber a
//! newer one.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    widgets::ListState,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::kalshi::{KalshiClient, KalshiError, ListQuery, Page, ViewType};
use crate::tui::events::{EventHandler, InputEvent};
use crate::tui::state::{Action, BrowserState, FetchRequest, Filters};
use crate::tui::ui;

/// Status values the `s` key cycles through. Empty = unfiltered.
const STATUS_CYCLE: &[&str] = &["", "active", "closed", "settled"];

/// Categories the `c` key cycles through; `/` accepts anything.
const CATEGORY_CYCLE: &[&str] = &[
    "",
    "Politics",
    "Sports",
    "Economics",
    "Financials",
    "Science and Technology",
    "Climate and Weather",
    "Entertainment",
    "World",
];

/// A completed fetch, tagged with the sequence number of the request
/// that started it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<Page, KalshiError>,
}

pub struct BrowseApp {
    pub state: BrowserState,
    pub list_state: ListState,
    /// `Some` while the user is typing a category filter.
    pub category_input: Option<String>,
    pub should_quit: bool,
    client: KalshiClient,
    fetch_tx: mpsc::UnboundedSender<FetchOutcome>,
    fetch_rx: Option<mpsc::UnboundedReceiver<FetchOutcome>>,
}

impl BrowseApp {
    pub fn new(client: KalshiClient, filters: Filters) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        Self {
            state: BrowserState::new(filters),
            list_state: ListState::default(),
            category_input: None,
            should_quit: false,
            client,
            fetch_tx,
            fetch_rx: Some(fetch_rx),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut events = EventHandler::new(Duration::from_millis(250));
        let mut fetch_rx = self.fetch_rx.take().expect("browser already running");

        // Initial reset fetch under the starting filters.
        self.dispatch(Action::Refreshed);

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(InputEvent::Key(key)) => self.on_key(key),
                    Some(InputEvent::Error(message)) => warn!("{}", message),
                    Some(InputEvent::Tick) => {}
                    None => break,
                },
                Some(outcome) = fetch_rx.recv() => self.on_fetch(outcome),
            }
        }

        Ok(())
    }

    /// Run one action through the reducer and start whatever fetch it
    /// demands.
    pub fn dispatch(&mut self, action: Action) {
        if let Some(request) = self.state.apply(action) {
            debug!(seq = request.seq, view = %request.view, "Starting fetch");
            self.spawn_fetch(request);
        }
        self.sync_selection();
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let client = self.client.clone();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let query = ListQuery {
                status: request.status,
                category: request.category,
                cursor: request.cursor,
                limit: None,
            };
            let result = client.fetch_page(request.view, &query).await;
            if let Err(e) = &result {
                warn!(seq = request.seq, "Fetch failed: {}", e);
            }
            let _ = tx.send(FetchOutcome {
                seq: request.seq,
                result,
            });
        });
    }

    fn on_fetch(&mut self, outcome: FetchOutcome) {
        let action = match outcome.result {
            Ok(page) => Action::FetchSucceeded {
                seq: outcome.seq,
                page,
            },
            Err(e) => Action::FetchFailed {
                seq: outcome.seq,
                message: e.to_string(),
            },
        };
        self.dispatch(action);
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.category_input.is_some() {
            self.on_category_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Char('v') => {
                let view = self.state.filters.view.toggled();
                self.set_view(view);
            }
            KeyCode::Char('m') => self.set_view(ViewType::Markets),
            KeyCode::Char('e') => self.set_view(ViewType::Events),
            KeyCode::Char('s') => self.cycle_status(),
            KeyCode::Char('c') => self.cycle_category(),
            KeyCode::Char('/') => {
                self.category_input = Some(self.state.filters.category.clone());
            }
            KeyCode::Char('r') => self.dispatch(Action::Refreshed),
            KeyCode::Enter => self.dispatch(Action::LoadMoreRequested),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            _ => {}
        }
    }

    fn on_category_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.category_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.category_input = None,
            KeyCode::Enter => {
                let category = input.clone();
                self.category_input = None;
                let mut filters = self.state.filters.clone();
                filters.category = category;
                self.dispatch(Action::FiltersChanged(filters));
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }

    fn set_view(&mut self, view: ViewType) {
        if self.state.filters.view == view {
            return;
        }
        let mut filters = self.state.filters.clone();
        filters.view = view;
        self.dispatch(Action::FiltersChanged(filters));
    }

    fn cycle_status(&mut self) {
        let mut filters = self.state.filters.clone();
        filters.status = next_in_cycle(STATUS_CYCLE, &filters.status);
        self.dispatch(Action::FiltersChanged(filters));
    }

    fn cycle_category(&mut self) {
        let mut filters = self.state.filters.clone();
        filters.category = next_in_cycle(CATEGORY_CYCLE, &filters.category);
        self.dispatch(Action::FiltersChanged(filters));
    }

    fn select_next(&mut self) {
        if self.state.items.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < self.state.items.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    fn select_previous(&mut self) {
        if self.state.items.is_empty() {
            return;
        }
        let previous = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(previous));
    }

    /// Keep the highlighted row inside the (possibly just-cleared)
    /// item list.
    fn sync_selection(&mut self) {
        let len = self.state.items.len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        match self.list_state.selected() {
            None => self.list_state.select(Some(0)),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }
}

/// A free-form value not in the cycle restarts it from the beginning.
fn next_in_cycle(cycle: &[&str], current: &str) -> String {
    let position = cycle.iter().position(|value| *value == current);
    let next = match position {
        Some(i) => cycle[(i + 1) % cycle.len()],
        None => cycle[0],
    };
    next.to_string()
}
