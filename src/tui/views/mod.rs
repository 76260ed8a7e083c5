pub mod table;
pub mod tables;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Popup};

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Converts a text length to a terminal width, saturating at `u16::MAX`.
pub fn clamp_len(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}

/// File name of the open store, for titles and the status bar.
pub fn store_name(app: &App) -> String {
    app.store_path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| app.store_path.display().to_string())
}

/// Draws the message popup over whatever screen is showing.
pub fn render_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Popup::Message { title, body } = &app.popup else {
        return;
    };

    let width = clamp_len(body.chars().count())
        .saturating_add(6)
        .max(30)
        .min(area.width.saturating_sub(4));
    let popup_area = centered_rect(width, 7, area);
    frame.render_widget(Clear, popup_area);

    let color = if title.contains("Error") {
        Color::Red
    } else {
        Color::Green
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::from(""),
        Line::from(format!("  {}", body)),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " Enter/Esc ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("close"),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}
