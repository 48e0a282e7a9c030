//! Keys bar: the bottom line with the key bindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ACCENT, C_MUTED, C_SEPARATOR};

const KEYS: &[(&str, &str)] = &[
    ("↑↓/jk", "move"),
    ("←→/hl", "tiles"),
    ("Enter", "open"),
    ("y", "copy url"),
    ("q", "quit"),
];

pub fn keys_line() -> Line<'static> {
    let mut spans = vec![Span::styled(
        " TV ",
        Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
    )];
    for (i, (key, what)) in KEYS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │", Style::default().fg(C_SEPARATOR)));
        }
        spans.push(Span::styled(format!(" {} ", key), Style::default().fg(C_ACCENT)));
        spans.push(Span::styled(*what, Style::default().fg(C_MUTED)));
    }
    Line::from(spans)
}

pub fn draw_keys_bar(frame: &mut Frame, area: Rect) {
    frame.render_widget(Paragraph::new(keys_line()), area);
}
