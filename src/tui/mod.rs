//! Terminal User Interface (TUI) module for browsing Kalshi data
//!
//! Interactive market and event browser built on ratatui:
//! - Explicit browser state with a pure, sequence-numbered reducer
//! - Keyboard-driven filter controls and cursor pagination
//! - Card renderers for market and event records

pub mod app;
pub mod cards;
pub mod events;
pub mod state;
pub mod ui;

pub use app::BrowseApp;
pub use events::EventHandler;
pub use state::{Action, BrowserState, FetchRequest, Filters};
