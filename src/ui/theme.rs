use ratatui::style::Color;

use crate::model::issue::StateType;

/// Per-assignee bar palette.
pub const ASSIGNEE_COLORS: [Color; 12] = [
    Color::Rgb(0xEF, 0x44, 0x44), // red
    Color::Rgb(0xF9, 0x73, 0x16), // orange
    Color::Rgb(0xEA, 0xB3, 0x08), // yellow
    Color::Rgb(0x22, 0xC5, 0x5E), // green
    Color::Rgb(0x06, 0xB6, 0xD4), // cyan
    Color::Rgb(0x3B, 0x82, 0xF6), // blue
    Color::Rgb(0x8B, 0x5C, 0xF6), // violet
    Color::Rgb(0xEC, 0x48, 0x99), // pink
    Color::Rgb(0xF5, 0x9E, 0x0B), // amber
    Color::Rgb(0x10, 0xB9, 0x81), // emerald
    Color::Rgb(0x63, 0x66, 0xF1), // indigo
    Color::Rgb(0xD9, 0x46, 0xEF), // fuchsia
];

pub const DEFAULT_ASSIGNEE_COLOR: Color = Color::Rgb(0x6B, 0x72, 0x80); // gray

/// Stable color per assignee: the same id always hashes to the same
/// palette entry. Unassigned bars are gray.
pub fn assignee_color(assignee_id: Option<&str>) -> Color {
    let Some(id) = assignee_id else {
        return DEFAULT_ASSIGNEE_COLOR;
    };
    let mut hash: i32 = 0;
    for c in id.chars() {
        hash = (c as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    ASSIGNEE_COLORS[hash.unsigned_abs() as usize % ASSIGNEE_COLORS.len()]
}

pub fn state_color(state_type: StateType) -> Color {
    match state_type {
        StateType::Completed => Color::Green,
        StateType::Started => Color::Blue,
        StateType::Canceled => Color::Red,
        StateType::Backlog => Color::Yellow,
        StateType::Unstarted | StateType::Unknown => Color::Gray,
    }
}
