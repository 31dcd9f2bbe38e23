//! Frame layout for the browser.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

use crate::kalshi::ViewType;
use crate::tui::app::BrowseApp;
use crate::tui::cards;

pub fn draw(frame: &mut Frame<'_>, app: &mut BrowseApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_content(frame, chunks[1], app);
    draw_footer(frame, chunks[2], app);

    if app.category_input.is_some() {
        draw_category_input(frame, app);
    }
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &BrowseApp) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(area);

    let selected = ViewType::all()
        .iter()
        .position(|v| *v == app.state.filters.view)
        .unwrap_or(0);
    let tabs = Tabs::new(ViewType::all().iter().map(|v| v.title()))
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, columns[0]);

    let filters = &app.state.filters;
    let filter_line = Line::from(vec![
        Span::styled("status: ", Style::default().fg(Color::DarkGray)),
        Span::raw(display_filter(&filters.status)),
        Span::raw("   "),
        Span::styled("category: ", Style::default().fg(Color::DarkGray)),
        Span::raw(display_filter(&filters.category)),
    ]);
    let filter_bar = Paragraph::new(filter_line)
        .block(Block::default().borders(Borders::ALL).title("Filters"));
    frame.render_widget(filter_bar, columns[1]);
}

fn draw_content(frame: &mut Frame<'_>, area: Rect, app: &mut BrowseApp) {
    let title = format!(
        " {} ({}) ",
        app.state.filters.view.title(),
        app.state.items.len()
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    // While a fetch is in flight the item region is replaced by the
    // loading indicator.
    if app.state.loading {
        let loading = Paragraph::new(format!("Loading {}...", app.state.filters.view))
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if app.state.items.is_empty() {
        let empty = Paragraph::new("No results for the current filters")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem<'_>> = app
        .state
        .items
        .iter()
        .map(|item| ListItem::new(Text::from(cards::item_card(item))))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &BrowseApp) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let status_line = match &app.state.error {
        Some(error) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::default(),
    };
    frame.render_widget(Paragraph::new(status_line), rows[0]);

    let mut hints = vec![Span::styled(
        "q quit | Tab view | s status | c category | / type category | r refresh | ↑↓ scroll",
        Style::default().fg(Color::DarkGray),
    )];
    // Offered only when a cursor is held and no fetch is in flight.
    if app.state.can_load_more() {
        hints.push(Span::styled(
            " | Enter load more",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(hints)), rows[1]);
}

fn draw_category_input(frame: &mut Frame<'_>, app: &BrowseApp) {
    let Some(input) = &app.category_input else {
        return;
    };
    let area = frame.area();
    let width = area.width.min(50);
    let input_area = Rect::new(
        (area.width.saturating_sub(width)) / 2,
        area.height.saturating_sub(4),
        width,
        3,
    );

    let prompt = Paragraph::new(format!("{}_", input)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Category (Enter to apply, Esc to cancel)")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(prompt, input_area);
}

fn display_filter(value: &str) -> &str {
    if value.is_empty() {
        "all"
    } else {
        value
    }
}
