use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::tui::app::App;
use crate::tui::views::{render_popup, store_name};
use crate::tui::widgets::status_bar;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let main_area = chunks[0];
    let status_area = chunks[1];
    let name = store_name(app);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ({} tables) ", name, app.tables.len()))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let inner = block.inner(main_area);
    frame.render_widget(block, main_area);

    if app.tables.is_empty() {
        let msg = Paragraph::new("This store has no tables").style(Style::default().fg(Color::Gray));
        frame.render_widget(msg, inner);
    } else {
        let width = app.tables.iter().map(|t| t.name.chars().count()).max().unwrap_or(0);
        let items: Vec<ListItem> = app
            .tables
            .iter()
            .map(|t| {
                let count = t
                    .row_count
                    .map(|n| format!("{} rows", n))
                    .unwrap_or_else(|| "unreadable".to_string());
                ListItem::new(format!("{:<width$}  {}", t.name, count, width = width))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(app.tables_selected));
        frame.render_stateful_widget(list, inner, &mut state);
    }

    status_bar::render(
        frame,
        status_area,
        &[("\u{2191}\u{2193}", "navigate"), ("Enter", "open"), ("q", "quit")],
        &name,
    );

    render_popup(frame, app, area);
}
