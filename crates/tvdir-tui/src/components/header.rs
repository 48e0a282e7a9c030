//! Header: application title on the left, live clock on the right.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app_state::AppState,
    component::Component,
    theme::{style_accent, C_CLOCK, C_SEPARATOR},
};

pub const TITLE: &str = " 📺 tvdir ";

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Header {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(C_SEPARATOR));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(TITLE, style_accent()))),
            inner,
        );

        // The clock yields to the title when the terminal is narrow.
        let clock = &state.clock.display;
        if clock.width() + TITLE.width() + 2 <= inner.width as usize {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("{} ", clock),
                    Style::default().fg(C_CLOCK).add_modifier(Modifier::BOLD),
                )))
                .alignment(Alignment::Right),
                inner,
            );
        }
    }

    fn height(&self) -> u16 {
        2
    }
}
