use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::App;
use crate::core::date::format_short;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut entries: Vec<ListItem> = Vec::with_capacity(app.cycles.len() + 1);

    entries.push(entry(
        "All issues (no cycle)".to_string(),
        app.picker_index == 0,
        app.selected_cycle_id.is_none(),
    ));

    for (i, cycle) in app.cycles.iter().enumerate() {
        let label = format!(
            "{}  {} – {}",
            cycle.name,
            format_short(cycle.starts_at),
            format_short(cycle.ends_at),
        );
        let current = app.selected_cycle_id.as_deref() == Some(cycle.id.as_str());
        entries.push(entry(label, app.picker_index == i + 1, current));
    }

    let list = List::new(entries).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Select cycle "),
    );
    f.render_widget(list, area);
}

fn entry(label: String, selected: bool, current: bool) -> ListItem<'static> {
    let marker = if current { "● " } else { "  " };
    let style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Green)),
        Span::styled(label, style),
    ]))
}
