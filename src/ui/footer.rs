use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, ViewMode};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    match app.view_mode {
        ViewMode::Chart => {
            spans.push(hint("↑↓", "scroll"));
            spans.push(hint("tab", "switch chart"));
            spans.push(hint("c", "cycle"));
            spans.push(hint("a", "assignee"));
            spans.push(hint("r", "refresh"));
            spans.push(hint("esc", "clear filters"));
            spans.push(hint("q", "quit"));
        }
        ViewMode::CyclePicker | ViewMode::AssigneePicker => {
            spans.push(hint("↑↓", "navigate"));
            spans.push(hint("enter", "select"));
            spans.push(hint("esc", "back"));
            spans.push(hint("q", "quit"));
        }
    }

    if app.loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            " SYNCING ",
            Style::default()
                .fg(ratatui::style::Color::Black)
                .bg(ratatui::style::Color::Cyan),
        ));
    }

    // Flash message
    if let Some((msg, _)) = &app.flash_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            msg,
            Style::default().fg(ratatui::style::Color::Yellow),
        ));
    }

    let line = Line::from(spans);
    let paragraph = Paragraph::new(line);
    f.render_widget(paragraph, area);
}

fn hint(key: &str, desc: &str) -> Span<'static> {
    Span::styled(
        format!(" {key}:{desc} "),
        Style::default().fg(ratatui::style::Color::DarkGray),
    )
}
