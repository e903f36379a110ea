use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::{App, AssigneeFilter};
use crate::ui::theme::{assignee_color, DEFAULT_ASSIGNEE_COLOR};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let options = app.assignee_options();
    let mut entries: Vec<ListItem> = Vec::with_capacity(options.len() + 2);

    entries.push(entry(
        "Everyone",
        DEFAULT_ASSIGNEE_COLOR,
        app.picker_index == 0,
        app.assignee_filter.is_none(),
    ));
    entries.push(entry(
        "Unassigned",
        DEFAULT_ASSIGNEE_COLOR,
        app.picker_index == 1,
        app.assignee_filter == Some(AssigneeFilter::Unassigned),
    ));

    for (i, assignee) in options.iter().enumerate() {
        let current = matches!(
            &app.assignee_filter,
            Some(AssigneeFilter::Id(id)) if id == &assignee.id
        );
        entries.push(entry(
            &assignee.display_name,
            assignee_color(Some(&assignee.id)),
            app.picker_index == i + 2,
            current,
        ));
    }

    let list = List::new(entries).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Filter by assignee "),
    );
    f.render_widget(list, area);
}

fn entry(label: &str, color: Color, selected: bool, current: bool) -> ListItem<'static> {
    let marker = if current { "● " } else { "  " };
    let style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    ListItem::new(Line::from(vec![
        Span::styled("■ ", Style::default().fg(color)),
        Span::styled(marker.to_string(), Style::default().fg(Color::Green)),
        Span::styled(label.to_string(), style),
    ]))
}
