use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::core::consts::CHILD_PREFIX;
use crate::core::date::{date_grid, format_short, is_today, is_weekend};
use crate::core::layout::{compute_layout, resolve_time_range, ItemPosition, TimeRange};
use crate::core::timeline::{build_timeline, TimelineItem};
use crate::ui::theme::{assignee_color, state_color};

/// Issue label column width; the rest of the width is the day grid.
const LABEL_WIDTH: u16 = 44;

pub fn render(f: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
    let issues = app.filtered_issues();
    let cycle = app.selected_cycle();

    let title = match (cycle, app.loading) {
        (Some(c), true) => format!(" Gantt — {} (loading...) ", c.name),
        (Some(c), false) => format!(" Gantt — {} ", c.name),
        (None, true) => " Gantt — all cycles (loading...) ".to_string(),
        (None, false) => " Gantt — all cycles ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if issues.is_empty() {
        let msg = Paragraph::new("No issues match the current filters")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(msg, inner);
        return;
    }

    let items = build_timeline(&issues, cycle, now);
    let range = resolve_time_range(&items, cycle, now);
    let positions = compute_layout(&items, &range);

    let label_width = LABEL_WIDTH.min(inner.width / 2) as usize;
    let chart_width = (inner.width as usize).saturating_sub(label_width);

    let mut lines = Vec::with_capacity(inner.height as usize);
    lines.push(header_line(&range, label_width, chart_width, now));

    let visible = (inner.height as usize).saturating_sub(1);
    for (item, pos) in items
        .iter()
        .zip(&positions)
        .skip(app.scroll)
        .take(visible)
    {
        lines.push(item_line(item, pos, label_width, chart_width));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Date header: one proportional cell per grid day, weekends dimmed and
/// today highlighted.
fn header_line(
    range: &TimeRange,
    label_width: usize,
    chart_width: usize,
    now: DateTime<Utc>,
) -> Line<'static> {
    let grid = date_grid(range.start, range.end);
    let mut spans = vec![Span::raw(" ".repeat(label_width))];

    let total = grid.len().max(1);
    for (i, day) in grid.iter().enumerate() {
        let x = i * chart_width / total;
        let next_x = (i + 1) * chart_width / total;
        let cell_width = next_x - x;
        if cell_width == 0 {
            continue;
        }

        let label = format_short(*day);
        let text = if label.len() <= cell_width {
            format!("{label:<cell_width$}")
        } else {
            " ".repeat(cell_width)
        };

        let style = if is_today(*day, now) {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else if is_weekend(*day) {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(text, style));
    }

    Line::from(spans)
}

fn item_line(
    item: &TimelineItem,
    pos: &ItemPosition,
    label_width: usize,
    chart_width: usize,
) -> Line<'static> {
    let mut spans = Vec::new();

    // Label: indented identifier, title, assignee.
    let indent = "  ".repeat(item.hierarchy_level);
    let prefix = if item.hierarchy_level > 0 {
        format!("{indent}{CHILD_PREFIX} ")
    } else {
        indent
    };
    let id_span = Span::styled(
        format!("{prefix}{} ", item.identifier),
        Style::default().fg(state_color(item.state.state_type)),
    );

    let used = prefix_len(&id_span);
    let assignee = item
        .assignee
        .as_ref()
        .map(|a| format!(" · {}", a.display_name))
        .unwrap_or_default();
    let remaining = label_width.saturating_sub(used);
    let title: String = truncate_pad(&format!("{}{assignee}", item.title), remaining);

    spans.push(id_span);
    spans.push(Span::raw(title));

    // Bar, positioned from the normalized layout percentages.
    let bar_start =
        ((pos.left_pct / 100.0 * chart_width as f64).round() as usize).min(chart_width);
    let bar_width = if pos.width_pct == 0.0 {
        0
    } else {
        ((pos.width_pct / 100.0 * chart_width as f64).round() as usize)
            .max(1)
            .min(chart_width - bar_start)
    };

    spans.push(Span::raw(" ".repeat(bar_start)));
    if bar_width > 0 {
        let color = assignee_color(item.assignee.as_ref().map(|a| a.id.as_str()));
        let done = bar_width * item.progress as usize / 100;
        if done > 0 {
            spans.push(Span::styled(
                "█".repeat(done),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        if bar_width > done {
            spans.push(Span::styled(
                "▒".repeat(bar_width - done),
                Style::default().fg(color),
            ));
        }
    }

    Line::from(spans)
}

fn prefix_len(span: &Span) -> usize {
    span.content.chars().count()
}

fn truncate_pad(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}
