use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::views::clamp_len;

/// Key hints on the left, the store file name on the right.
pub fn render(frame: &mut Frame, area: Rect, bindings: &[(&str, &str)], store: &str) {
    let bar_style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(clamp_len(store.chars().count()).saturating_add(2)),
        ])
        .split(area);

    let spans: Vec<Span> = bindings
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(
                    format!(" {} ", key),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Gray)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {} ", desc)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), chunks[0]);
    frame.render_widget(
        Paragraph::new(format!(" {} ", store))
            .style(bar_style.add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Right),
        chunks[1],
    );
}
