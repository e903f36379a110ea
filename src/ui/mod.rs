pub mod assignee_picker;
pub mod burndown;
pub mod cycle_picker;
pub mod footer;
pub mod gantt;
pub mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{App, ChartView, ViewMode};

pub fn render(f: &mut Frame, app: &App) {
    // The clock is read once per frame; everything below is a pure
    // function of the snapshot and this instant.
    let now = chrono::Utc::now();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // chart or picker
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    match app.view_mode {
        ViewMode::Chart => match app.chart {
            ChartView::Gantt => gantt::render(f, vertical[0], app, now),
            ChartView::Burndown => burndown::render(f, vertical[0], app, now),
        },
        ViewMode::CyclePicker => cycle_picker::render(f, vertical[0], app),
        ViewMode::AssigneePicker => assignee_picker::render(f, vertical[0], app),
    }

    footer::render(f, vertical[1], app);
}
