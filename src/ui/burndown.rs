use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::core::burndown::{compute_burndown, today_index};
use crate::core::date::format_short;

pub fn render(f: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
    let issues = app.filtered_issues();
    let cycle = app.selected_cycle();

    let mode = if cycle.is_some() {
        "cycle target"
    } else {
        "due-date based"
    };

    if issues.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Burndown ");
        let inner = block.inner(area);
        f.render_widget(block, area);
        let msg = Paragraph::new("No issues match the current filters")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(msg, inner);
        return;
    }

    let points = compute_burndown(&issues, cycle, now);
    let total = points.first().map(|p| p.total_planned).unwrap_or(0.0);
    let remaining = points.last().map(|p| p.actual_remaining).unwrap_or(0.0);

    let title = if app.loading {
        format!(" Burndown — {total:.0} pts planned, {remaining:.1} remaining ({mode}) (loading...) ")
    } else {
        format!(" Burndown — {total:.0} pts planned, {remaining:.1} remaining ({mode}) ")
    };

    let planned: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.planned_remaining))
        .collect();
    let actual: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.actual_remaining))
        .collect();

    let max_y = points
        .iter()
        .map(|p| p.planned_remaining.max(p.actual_remaining).max(p.total_planned))
        .fold(1.0_f64, f64::max);

    // Vertical dotted marker on today's column, when the range includes it.
    let today_marker: Vec<(f64, f64)> = match today_index(&points, now) {
        Some(idx) => (0..=20)
            .map(|step| (idx as f64, max_y * step as f64 / 20.0))
            .collect(),
        None => Vec::new(),
    };

    let mut datasets = vec![
        Dataset::default()
            .name("planned")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&planned),
        Dataset::default()
            .name("actual")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&actual),
    ];
    if !today_marker.is_empty() {
        datasets.push(
            Dataset::default()
                .name("today")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Green))
                .data(&today_marker),
        );
    }

    let max_x = (points.len().saturating_sub(1)).max(1) as f64;
    let mid = points.len() / 2;
    let x_labels: Vec<Span> = [0, mid, points.len() - 1]
        .iter()
        .map(|&i| Span::raw(format_short(points[i].date)))
        .collect();
    let y_labels: Vec<Span> = [0.0, max_y / 2.0, max_y]
        .iter()
        .map(|v| Span::raw(format!("{v:.0}")))
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_y])
                .labels(y_labels),
        )
        .legend_position(Some(ratatui::widgets::LegendPosition::TopRight));

    f.render_widget(chart, area);
}
