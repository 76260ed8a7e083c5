use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Tabs};

use crate::tui::app::{App, PAGE_SIZE, TableTab};
use crate::tui::views::{render_popup, store_name};
use crate::tui::widgets::status_bar;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let main_area = chunks[0];
    let info_area = chunks[1];
    let status_area = chunks[2];

    let title = match app.table_name {
        Some(ref name) => format!(" {} ({} rows) ", name, app.table_row_count),
        None => " Table ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    let inner = block.inner(main_area);
    frame.render_widget(block, main_area);

    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let tab_index: usize = match app.table_tab {
        TableTab::Schema => 0,
        TableTab::Preview => 1,
    };
    let tabs = Tabs::new(vec!["Schema", "Preview"])
        .select(tab_index)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, inner_chunks[0]);

    match app.table_tab {
        TableTab::Schema => render_schema(frame, app, inner_chunks[1]),
        TableTab::Preview => render_preview(frame, app, inner_chunks[1]),
    }

    if app.table_tab == TableTab::Preview {
        render_page_info(frame, app, info_area);
    }

    let mut hints: Vec<(&str, &str)> = vec![("Tab", "Switch"), ("\u{2191}\u{2193}", "Scroll")];
    if app.table_tab == TableTab::Preview {
        hints.push(("\u{2190}", "Previous page"));
        hints.push(("\u{2192}", "Next page"));
    }
    hints.extend_from_slice(&[("Esc", "Back"), ("q", "Quit")]);

    status_bar::render(frame, status_area, &hints, &store_name(app));

    render_popup(frame, app, area);
}

fn render_page_info(frame: &mut Frame, app: &App, area: Rect) {
    let from = if app.table_row_count == 0 {
        0
    } else {
        app.table_page * PAGE_SIZE + 1
    };
    let to = ((app.table_page + 1) * PAGE_SIZE).min(app.table_row_count);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Paragraph::new(format!(" showing {} to {} of {} ", from, to, app.table_row_count))
        .style(Style::default().fg(Color::DarkGray));
    let right = Paragraph::new(format!(
        " page {} of {} ",
        app.table_page + 1,
        app.total_pages().max(1)
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Right);

    frame.render_widget(left, info_chunks[0]);
    frame.render_widget(right, info_chunks[1]);
}

fn render_schema(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Column Name", "Type", "Not Null", "Primary Key"])
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let flag = |set: bool| String::from(if set { "yes" } else { "" });

    let rows: Vec<Row> = app
        .table_columns
        .iter()
        .skip(app.table_scroll)
        .map(|col| {
            let decl_type = if col.decl_type.is_empty() {
                "-".to_string()
            } else {
                col.decl_type.clone()
            };
            Row::new(vec![col.name.clone(), decl_type, flag(col.not_null), flag(col.primary_key)])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(15),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(header);

    frame.render_widget(table, area);
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    if app.preview_headers.is_empty() {
        let msg = Paragraph::new("No rows to show").style(Style::default().fg(Color::Gray));
        frame.render_widget(msg, area);
        return;
    }

    let header = Row::new(app.preview_headers.clone())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .preview_data
        .iter()
        .skip(app.table_scroll)
        .map(|row_data| Row::new(row_data.clone()))
        .collect();

    let widths: Vec<Constraint> = app.preview_headers.iter().map(|_| Constraint::Min(10)).collect();

    let table = Table::new(rows, widths).header(header);
    frame.render_widget(table, area);
}
